//! A canned-response transport for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::neo_clients::{JsonRpcTransport, ProviderError};

type RawResponder = Box<dyn Fn(&Value) -> Value + Send>;
type BatchResponder = Box<dyn Fn(&[Value]) -> Value + Send>;

enum Responder {
	Result(Value),
	Error { code: i64, message: String },
	Raw(RawResponder),
}

/// Replays canned responses per method, in FIFO order, and records every
/// request it sees.
#[derive(Default)]
pub struct MockTransport {
	responders: Mutex<HashMap<String, VecDeque<Responder>>>,
	batch_responder: Mutex<Option<BatchResponder>>,
	requests: Mutex<Vec<Value>>,
}

impl MockTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues a successful `result` for the next call of `method`. The last
	/// queued response is replayed for any further calls.
	pub fn respond_with(&self, method: &str, result: Value) {
		self.responders
			.lock()
			.unwrap()
			.entry(method.to_string())
			.or_default()
			.push_back(Responder::Result(result));
	}

	/// Queues a node error for the next call of `method`.
	pub fn fail_with(&self, method: &str, code: i64, message: &str) {
		self.responders
			.lock()
			.unwrap()
			.entry(method.to_string())
			.or_default()
			.push_back(Responder::Error { code, message: message.to_string() });
	}

	/// Queues a responder that builds the full envelope itself.
	pub fn respond_raw<F>(&self, method: &str, responder: F)
	where
		F: Fn(&Value) -> Value + Send + 'static,
	{
		self.responders
			.lock()
			.unwrap()
			.entry(method.to_string())
			.or_default()
			.push_back(Responder::Raw(Box::new(responder)));
	}

	/// Installs the responder used for batch (array) payloads.
	pub fn respond_batch<F>(&self, responder: F)
	where
		F: Fn(&[Value]) -> Value + Send + 'static,
	{
		*self.batch_responder.lock().unwrap() = Some(Box::new(responder));
	}

	/// All requests posted so far.
	pub fn requests(&self) -> Vec<Value> {
		self.requests.lock().unwrap().clone()
	}

	/// Number of posted requests for one method.
	pub fn calls_of(&self, method: &str) -> usize {
		self.requests
			.lock()
			.unwrap()
			.iter()
			.filter(|r| r.get("method").and_then(Value::as_str) == Some(method))
			.count()
	}
}

impl JsonRpcTransport for MockTransport {
	fn post(&self, payload: &Value) -> Result<Value, ProviderError> {
		self.requests.lock().unwrap().push(payload.clone());

		if let Some(batch) = payload.as_array() {
			let responder = self.batch_responder.lock().unwrap();
			let responder = responder
				.as_ref()
				.ok_or_else(|| ProviderError::ProtocolError("no batch responder".to_string()))?;
			return Ok(responder(batch));
		}

		let method = payload
			.get("method")
			.and_then(Value::as_str)
			.ok_or_else(|| ProviderError::ProtocolError("request without method".to_string()))?
			.to_string();
		let id = payload.get("id").cloned().unwrap_or(Value::Null);

		let mut responders = self.responders.lock().unwrap();
		let queue = responders.get_mut(&method).ok_or_else(|| {
			ProviderError::ProtocolError(format!("no canned response for {method}"))
		})?;
		let responder = queue.pop_front().ok_or_else(|| {
			ProviderError::ProtocolError(format!("canned responses for {method} exhausted"))
		})?;

		let envelope = match &responder {
			Responder::Result(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
			Responder::Error { code, message } => json!({
				"jsonrpc": "2.0",
				"id": id,
				"error": {"code": code, "message": message},
			}),
			Responder::Raw(build) => build(payload),
		};

		// The last plain responder sticks, so polling loops can keep asking.
		if queue.is_empty() {
			match responder {
				Responder::Result(value) => queue.push_back(Responder::Result(value)),
				Responder::Error { code, message } => {
					queue.push_back(Responder::Error { code, message })
				},
				Responder::Raw(_) => {},
			}
		}
		Ok(envelope)
	}
}
