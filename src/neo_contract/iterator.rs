//! Traversal of server-side iterators.
//!
//! `invokefunction` results whose stack holds `InteropInterface` iterator
//! items expose a session and an iterator id; this wrapper pages through
//! `traverseiterator` and terminates the session when dropped.

use tracing::debug;

use crate::neo_clients::{JsonRpcTransport, RpcClient};
use crate::neo_config::NeoConstants;
use crate::neo_contract::ContractError;
use crate::neo_protocol::responses::InvocationResult;
use crate::neo_types::StackItem;

/// A handle on one server-side iterator.
pub struct NeoIterator<'a, T: JsonRpcTransport> {
	client: &'a RpcClient<T>,
	session: String,
	iterator_id: String,
	exhausted: bool,
	terminated: bool,
}

impl<'a, T: JsonRpcTransport> NeoIterator<'a, T> {
	pub fn new(client: &'a RpcClient<T>, session: String, iterator_id: String) -> Self {
		Self { client, session, iterator_id, exhausted: false, terminated: false }
	}

	/// Picks the first iterator item out of an invocation result.
	pub fn from_invocation(
		client: &'a RpcClient<T>,
		result: &InvocationResult,
	) -> Option<Self> {
		let session = result.session.clone()?;
		let iterator_id = result
			.stack
			.iter()
			.find_map(StackItem::as_interop_id)?
			.to_string();
		Some(Self::new(client, session, iterator_id))
	}

	pub fn session(&self) -> &str {
		&self.session
	}

	/// Drains the iterator in pages of `page_size`, returning all items.
	/// A fully traversed iterator is inert; further calls fail.
	pub fn traverse(&mut self, page_size: u32) -> Result<Vec<StackItem>, ContractError> {
		if self.terminated {
			return Err(ContractError::SessionTerminated);
		}
		if self.exhausted {
			return Err(ContractError::IteratorExhausted);
		}
		let page_size = if page_size == 0 {
			NeoConstants::MAX_ITERATOR_ITEMS_DEFAULT
		} else {
			page_size
		};

		let mut items = Vec::new();
		loop {
			let page =
				self.client
					.traverse_iterator(&self.session, &self.iterator_id, page_size)?;
			if page.is_empty() {
				break;
			}
			items.extend(page);
		}
		self.exhausted = true;
		Ok(items)
	}

	/// Terminates the backing session. Errors are ignored; the session
	/// expires server-side regardless.
	pub fn terminate(&mut self) {
		if self.terminated {
			return;
		}
		self.terminated = true;
		if let Err(e) = self.client.terminate_session(&self.session) {
			debug!("failed to terminate iterator session {}: {e}", self.session);
		}
	}
}

impl<T: JsonRpcTransport> Drop for NeoIterator<'_, T> {
	fn drop(&mut self) {
		self.terminate();
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::neo_clients::mock::MockTransport;

	fn stack_items(values: &[&str]) -> serde_json::Value {
		json!(values
			.iter()
			.map(|v| json!({"type": "ByteString", "value": v}))
			.collect::<Vec<_>>())
	}

	#[test]
	fn traverse_drains_pages_and_terminates_once_on_drop() {
		let mock = MockTransport::new();
		mock.respond_with("traverseiterator", stack_items(&["YQ==", "Yg=="])); // a, b
		mock.respond_with("traverseiterator", stack_items(&["Yw=="])); // c
		mock.respond_with("traverseiterator", json!([]));
		mock.respond_with("terminatesession", json!(true));
		let client = RpcClient::new(mock);

		{
			let mut iterator = NeoIterator::new(&client, "s1".to_string(), "i1".to_string());
			let items = iterator.traverse(2).unwrap();
			let values: Vec<String> =
				items.iter().map(|i| i.as_string().unwrap()).collect();
			assert_eq!(values, vec!["a", "b", "c"]);

			// Fully traversed: the iterator is inert.
			assert!(matches!(
				iterator.traverse(2).unwrap_err(),
				ContractError::IteratorExhausted
			));
		}

		assert_eq!(client.transport().calls_of("terminatesession"), 1);
		let terminate = client
			.transport()
			.requests()
			.into_iter()
			.find(|r| r["method"] == "terminatesession")
			.unwrap();
		assert_eq!(terminate["params"], json!(["s1"]));
	}

	#[test]
	fn explicit_terminate_prevents_double_termination() {
		let mock = MockTransport::new();
		mock.respond_with("terminatesession", json!(true));
		let client = RpcClient::new(mock);

		{
			let mut iterator = NeoIterator::new(&client, "s2".to_string(), "i1".to_string());
			iterator.terminate();
			assert!(matches!(
				iterator.traverse(10).unwrap_err(),
				ContractError::SessionTerminated
			));
		}
		assert_eq!(client.transport().calls_of("terminatesession"), 1);
	}

	#[test]
	fn from_invocation_picks_session_and_iterator() {
		let mock = MockTransport::new();
		let client = RpcClient::new(mock);
		let result: InvocationResult = serde_json::from_value(json!({
			"state": "HALT",
			"gasconsumed": "1",
			"stack": [{"type": "InteropInterface", "id": "iter-7", "interface": "IIterator"}],
			"session": "sess-3",
		}))
		.unwrap();

		let mut iterator = NeoIterator::from_invocation(&client, &result).unwrap();
		assert_eq!(iterator.session(), "sess-3");
		// Avoid a live terminate call on drop in this test.
		iterator.terminated = true;
	}
}
