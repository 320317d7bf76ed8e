use primitive_types::H256;
use serde::{Deserialize, Serialize};

use crate::neo_types::{deserialize_h256, serialize_h256};

/// Result of `sendrawtransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransaction {
	#[serde(serialize_with = "serialize_h256", deserialize_with = "deserialize_h256")]
	pub hash: H256,
}

/// Result of `validateaddress`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateAddress {
	pub address: String,
	#[serde(rename = "isvalid")]
	pub is_valid: bool,
}

/// Result of `getpeers`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peers {
	#[serde(default)]
	pub connected: Vec<AddressEntry>,
	#[serde(default)]
	pub unconnected: Vec<AddressEntry>,
	#[serde(default)]
	pub bad: Vec<AddressEntry>,
}

/// One peer address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressEntry {
	pub address: String,
	pub port: u16,
}

/// One entry of `getnextblockvalidators`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
	#[serde(rename = "publickey")]
	pub public_key: String,
	pub votes: String,
	#[serde(default)]
	pub active: bool,
}

/// Result of `getunclaimedgas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnclaimedGas {
	pub unclaimed: String,
	pub address: String,
}

/// Result of `getwalletbalance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletBalance {
	pub balance: String,
}
