use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::neo_types::{StackItem, VMState};

/// Result of `invokefunction`/`invokescript`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvocationResult {
	#[serde(default)]
	pub script: String,
	#[serde(default)]
	pub state: VMState,
	#[serde(rename = "gasconsumed", default)]
	pub gas_consumed: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub exception: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub notifications: Option<Value>,
	#[serde(default)]
	pub stack: Vec<StackItem>,
	/// Session id, present when the stack holds iterator interop items.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session: Option<String>,
}

impl InvocationResult {
	pub fn has_state_fault(&self) -> bool {
		self.state == VMState::Fault
	}

	/// First item of the result stack.
	pub fn first_stack_item(&self) -> Option<&StackItem> {
		self.stack.first()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_node_shape() {
		let json = serde_json::json!({
			"script": "IQ==",
			"state": "HALT",
			"gasconsumed": "1007390",
			"exception": null,
			"stack": [{ "type": "Integer", "value": "42" }],
		});
		let result: InvocationResult = serde_json::from_value(json).unwrap();
		assert!(!result.has_state_fault());
		assert_eq!(result.gas_consumed, "1007390");
		assert_eq!(result.first_stack_item().unwrap().as_int(), Some(42));
	}

	#[test]
	fn fault_state_is_reported() {
		let json = serde_json::json!({
			"state": "FAULT",
			"gasconsumed": "0",
			"exception": "shift out of range",
			"stack": [],
		});
		let result: InvocationResult = serde_json::from_value(json).unwrap();
		assert!(result.has_state_fault());
		assert_eq!(result.exception.as_deref(), Some("shift out of range"));
	}
}
