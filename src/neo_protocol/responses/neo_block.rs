use primitive_types::H256;
use serde::{Deserialize, Serialize};

use crate::neo_protocol::responses::neo_transaction_result::RTransaction;
use crate::neo_protocol::responses::neo_witness::NeoWitness;
use crate::neo_types::{deserialize_h256, serialize_h256};

/// Result of a verbose `getblock`/`getblockheader`. Header calls carry no
/// transaction list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeoBlock {
	#[serde(serialize_with = "serialize_h256", deserialize_with = "deserialize_h256")]
	pub hash: H256,
	pub size: u32,
	pub version: u32,
	#[serde(
		rename = "previousblockhash",
		serialize_with = "serialize_h256",
		deserialize_with = "deserialize_h256"
	)]
	pub prev_block_hash: H256,
	#[serde(
		rename = "merkleroot",
		serialize_with = "serialize_h256",
		deserialize_with = "deserialize_h256"
	)]
	pub merkle_root_hash: H256,
	pub time: u64,
	#[serde(default)]
	pub nonce: Option<String>,
	pub index: u32,
	#[serde(default)]
	pub primary: Option<u32>,
	#[serde(rename = "nextconsensus")]
	pub next_consensus: String,
	#[serde(default)]
	pub witnesses: Option<Vec<NeoWitness>>,
	#[serde(rename = "tx", default)]
	pub transactions: Option<Vec<RTransaction>>,
	#[serde(default)]
	pub confirmations: Option<u32>,
	#[serde(rename = "nextblockhash", default)]
	pub next_block_hash: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_header_shape() {
		let json = serde_json::json!({
			"hash": "2d5f3e8f5c7a1b9e4d6c8a2f1e3b5d7c9a1f3e5d7b9c1a3e5f7d9b1c3a5e7f9d",
			"size": 697,
			"version": 0,
			"previousblockhash": "1d5f3e8f5c7a1b9e4d6c8a2f1e3b5d7c9a1f3e5d7b9c1a3e5f7d9b1c3a5e7f9d",
			"merkleroot": "3d5f3e8f5c7a1b9e4d6c8a2f1e3b5d7c9a1f3e5d7b9c1a3e5f7d9b1c3a5e7f9d",
			"time": 1_627_894_840_919u64,
			"index": 1234,
			"nextconsensus": "NWPRqQvv6jkpQot1pLPhcEkEk6L77LHEHW",
			"confirmations": 10,
		});
		let block: NeoBlock = serde_json::from_value(json).unwrap();
		assert_eq!(block.index, 1234);
		assert!(block.transactions.is_none());
	}
}
