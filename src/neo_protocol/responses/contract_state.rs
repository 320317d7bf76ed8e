use primitive_types::H160;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::neo_types::{deserialize_h160, serialize_h160};

/// Result of `getcontractstate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractState {
	pub id: i32,
	#[serde(rename = "updatecounter", default)]
	pub update_counter: u32,
	#[serde(serialize_with = "serialize_h160", deserialize_with = "deserialize_h160")]
	pub hash: H160,
	pub nef: ContractNef,
	pub manifest: ContractManifest,
}

/// The NEF header as rendered in contract state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractNef {
	pub magic: u32,
	pub compiler: String,
	#[serde(default)]
	pub source: Option<String>,
	#[serde(default)]
	pub tokens: Vec<Value>,
	/// Base64 of the script.
	pub script: String,
	pub checksum: i64,
}

/// The contract manifest; nested sections stay as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractManifest {
	pub name: String,
	#[serde(default)]
	pub groups: Vec<Value>,
	#[serde(default)]
	pub features: Value,
	#[serde(rename = "supportedstandards", default)]
	pub supported_standards: Vec<String>,
	#[serde(default)]
	pub abi: Value,
	#[serde(default)]
	pub permissions: Vec<Value>,
	#[serde(default)]
	pub trusts: Value,
	#[serde(default)]
	pub extra: Value,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_node_shape() {
		let json = serde_json::json!({
			"id": -4,
			"updatecounter": 0,
			"hash": "d2a4cff31913016155e38e474a2c06d08be276cf",
			"nef": {
				"magic": 0x3346454E,
				"compiler": "neo-core-v3.0",
				"tokens": [],
				"script": "EEEa93tn",
				"checksum": 2663858513i64,
			},
			"manifest": {
				"name": "GasToken",
				"supportedstandards": ["NEP-17"],
				"abi": { "methods": [], "events": [] },
				"permissions": [],
			}
		});
		let state: ContractState = serde_json::from_value(json).unwrap();
		assert_eq!(state.manifest.name, "GasToken");
		assert_eq!(state.manifest.supported_standards, vec!["NEP-17"]);
	}
}
