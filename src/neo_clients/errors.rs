use thiserror::Error;

/// Errors thrown when talking to a node.
#[derive(Error, Debug)]
pub enum ProviderError {
	/// The HTTP round-trip failed below the JSON-RPC layer.
	#[error("transport error: {0}")]
	Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

	/// The per-request timeout elapsed.
	#[error("request timed out")]
	Timeout,

	/// The response is not a well-formed JSON-RPC 2.0 envelope.
	#[error("protocol error: {0}")]
	ProtocolError(String),

	/// The node answered with an error object.
	#[error("node error {code}: {message}")]
	NodeError { code: i64, message: String, data: Option<serde_json::Value> },

	/// The result did not have the shape the typed decoder expects.
	#[error("unexpected response shape: {0}")]
	UnexpectedResponseShape(String),
}

impl ProviderError {
	pub(crate) fn shape(context: impl Into<String>) -> Self {
		ProviderError::UnexpectedResponseShape(context.into())
	}
}

impl From<reqwest::Error> for ProviderError {
	fn from(err: reqwest::Error) -> Self {
		if err.is_timeout() {
			ProviderError::Timeout
		} else {
			ProviderError::Transport(Box::new(err))
		}
	}
}

impl From<serde_json::Error> for ProviderError {
	fn from(err: serde_json::Error) -> Self {
		ProviderError::UnexpectedResponseShape(err.to_string())
	}
}
