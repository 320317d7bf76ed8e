//! The blocking HTTP transport.

use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::neo_clients::ProviderError;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A transport that posts a JSON payload and returns the parsed response.
/// Every call is one synchronous round-trip.
pub trait JsonRpcTransport {
	fn post(&self, payload: &Value) -> Result<Value, ProviderError>;
}

/// `JsonRpcTransport` over blocking HTTP.
#[derive(Debug, Clone)]
pub struct HttpProvider {
	url: Url,
	client: reqwest::blocking::Client,
}

impl HttpProvider {
	/// Connects to `url` with the default 30 s timeout.
	pub fn new(url: impl AsRef<str>) -> Result<Self, ProviderError> {
		Self::with_timeout(url, DEFAULT_TIMEOUT)
	}

	/// Connects to `url` with a caller-chosen per-request timeout.
	pub fn with_timeout(url: impl AsRef<str>, timeout: Duration) -> Result<Self, ProviderError> {
		let url = Url::parse(url.as_ref())
			.map_err(|e| ProviderError::ProtocolError(format!("invalid url: {e}")))?;
		let client = reqwest::blocking::Client::builder()
			.timeout(timeout)
			.build()?;
		Ok(Self { url, client })
	}

	pub fn url(&self) -> &Url {
		&self.url
	}
}

impl JsonRpcTransport for HttpProvider {
	fn post(&self, payload: &Value) -> Result<Value, ProviderError> {
		let response = self
			.client
			.post(self.url.clone())
			.header("Content-Type", "application/json")
			.header("Accept", "application/json")
			.json(payload)
			.send()?;
		Ok(response.json()?)
	}
}
