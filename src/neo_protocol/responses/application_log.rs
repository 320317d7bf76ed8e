use primitive_types::H256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::neo_types::{deserialize_h256, serialize_h256, StackItem, VMState};

/// Result of `getapplicationlog`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationLog {
	#[serde(
		rename = "txid",
		serialize_with = "serialize_h256",
		deserialize_with = "deserialize_h256"
	)]
	pub tx_id: H256,
	#[serde(default)]
	pub executions: Vec<Execution>,
}

/// One trigger execution inside an application log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
	pub trigger: String,
	#[serde(rename = "vmstate")]
	pub vm_state: VMState,
	#[serde(default)]
	pub exception: Option<String>,
	#[serde(rename = "gasconsumed")]
	pub gas_consumed: String,
	#[serde(default)]
	pub stack: Vec<StackItem>,
	#[serde(default)]
	pub notifications: Vec<Notification>,
}

/// An event emitted during execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
	pub contract: String,
	#[serde(rename = "eventname")]
	pub event_name: String,
	#[serde(default)]
	pub state: Value,
}
