use primitive_types::H256;
use serde::{Deserialize, Serialize};

use crate::neo_builder::{Signer, TransactionAttribute};
use crate::neo_protocol::responses::neo_witness::NeoWitness;
use crate::neo_types::{deserialize_h256, serialize_h256, VMState};

/// A transaction as returned by verbose `getrawtransaction` and verbose
/// blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RTransaction {
	#[serde(serialize_with = "serialize_h256", deserialize_with = "deserialize_h256")]
	pub hash: H256,
	pub size: u32,
	pub version: u8,
	pub nonce: u32,
	pub sender: String,
	#[serde(rename = "sysfee")]
	pub sys_fee: String,
	#[serde(rename = "netfee")]
	pub net_fee: String,
	#[serde(rename = "validuntilblock")]
	pub valid_until_block: u32,
	#[serde(default)]
	pub signers: Vec<Signer>,
	#[serde(default)]
	pub attributes: Vec<TransactionAttribute>,
	/// Base64 of the script.
	pub script: String,
	#[serde(default)]
	pub witnesses: Vec<NeoWitness>,
	#[serde(rename = "blockhash", default)]
	pub block_hash: Option<String>,
	#[serde(default)]
	pub confirmations: Option<u32>,
	#[serde(rename = "blocktime", default)]
	pub block_time: Option<u64>,
	#[serde(rename = "vmstate", default)]
	pub vm_state: Option<VMState>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_node_shape() {
		let json = serde_json::json!({
			"hash": "2d5f3e8f5c7a1b9e4d6c8a2f1e3b5d7c9a1f3e5d7b9c1a3e5f7d9b1c3a5e7f9d",
			"size": 248,
			"version": 0,
			"nonce": 246876555u32,
			"sender": "NVkg1yRMSPehETwv9KWVlnh3E2dGrCRnmF",
			"sysfee": "9977780",
			"netfee": "1230610",
			"validuntilblock": 2106392,
			"signers": [{
				"account": "23ba2703c53263e8d6e522dc32203339dcd8eee9",
				"scopes": "CalledByEntry"
			}],
			"attributes": [],
			"script": "IQ==",
			"witnesses": [{ "invocation": "DEA=", "verification": "EQ==" }],
		});
		let tx: RTransaction = serde_json::from_value(json).unwrap();
		assert_eq!(tx.valid_until_block, 2_106_392);
		assert_eq!(tx.signers.len(), 1);
		assert_eq!(tx.witnesses.len(), 1);
	}
}
