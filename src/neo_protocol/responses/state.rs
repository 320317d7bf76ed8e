use serde::{Deserialize, Serialize};

use crate::neo_protocol::responses::neo_witness::NeoWitness;

/// Result of `getstateroot`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRoot {
	pub version: u8,
	pub index: u32,
	#[serde(rename = "roothash")]
	pub root_hash: String,
	#[serde(default)]
	pub witnesses: Vec<NeoWitness>,
}

/// Result of `getstateheight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateHeight {
	#[serde(rename = "localrootindex")]
	pub local_root_index: u32,
	#[serde(rename = "validatedrootindex")]
	pub validated_root_index: u32,
}

/// Result of `findstorage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundStorage {
	#[serde(default)]
	pub truncated: bool,
	#[serde(default)]
	pub next: u32,
	#[serde(default)]
	pub results: Vec<StorageEntry>,
}

/// One storage record; key and value are base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntry {
	pub key: String,
	pub value: String,
}
