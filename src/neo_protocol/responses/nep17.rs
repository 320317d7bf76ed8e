use primitive_types::H160;
use serde::{Deserialize, Serialize};

use crate::neo_types::{deserialize_h160, serialize_h160};

/// Result of `getnep17balances`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nep17Balances {
	pub address: String,
	#[serde(rename = "balance", default)]
	pub balances: Vec<Nep17Balance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nep17Balance {
	#[serde(
		rename = "assethash",
		serialize_with = "serialize_h160",
		deserialize_with = "deserialize_h160"
	)]
	pub asset_hash: H160,
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub symbol: Option<String>,
	#[serde(default)]
	pub decimals: Option<String>,
	pub amount: String,
	#[serde(rename = "lastupdatedblock")]
	pub last_updated_block: u32,
}

/// Result of `getnep17transfers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nep17Transfers {
	pub address: String,
	#[serde(default)]
	pub sent: Vec<Nep17Transfer>,
	#[serde(default)]
	pub received: Vec<Nep17Transfer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nep17Transfer {
	pub timestamp: u64,
	#[serde(
		rename = "assethash",
		serialize_with = "serialize_h160",
		deserialize_with = "deserialize_h160"
	)]
	pub asset_hash: H160,
	#[serde(rename = "transferaddress", default)]
	pub transfer_address: Option<String>,
	pub amount: String,
	#[serde(rename = "blockindex")]
	pub block_index: u32,
	#[serde(rename = "transfernotifyindex")]
	pub transfer_notify_index: u32,
	#[serde(rename = "txhash")]
	pub tx_hash: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_balances() {
		let json = serde_json::json!({
			"address": "NVkg1yRMSPehETwv9KWVlnh3E2dGrCRnmF",
			"balance": [{
				"assethash": "d2a4cff31913016155e38e474a2c06d08be276cf",
				"amount": "3000000100000",
				"lastupdatedblock": 2,
			}]
		});
		let balances: Nep17Balances = serde_json::from_value(json).unwrap();
		assert_eq!(balances.balances.len(), 1);
		assert_eq!(balances.balances[0].amount, "3000000100000");
	}
}
