//! The NEP-6 wallet file mapping.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::neo_protocol::ScryptParamsDef;

/// The persisted form of a wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nep6Wallet {
	pub name: String,
	pub version: String,
	pub scrypt: ScryptParamsDef,
	#[serde(default)]
	pub accounts: Vec<Nep6Account>,
	#[serde(default)]
	pub extra: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub tokens: Option<Value>,
}

/// One persisted account. `key` is the NEP-2 ciphertext; a plaintext
/// private key never appears in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nep6Account {
	pub address: String,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(rename = "isDefault", default)]
	pub is_default: bool,
	#[serde(default)]
	pub lock: bool,
	#[serde(default)]
	pub key: Option<String>,
	#[serde(default)]
	pub contract: Option<Nep6Contract>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub extra: Option<Value>,
}

/// The contract section of a persisted account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nep6Contract {
	/// Base64 of the verification script.
	#[serde(default)]
	pub script: Option<String>,
	#[serde(default)]
	pub parameters: Vec<Nep6Parameter>,
	#[serde(default)]
	pub deployed: bool,
}

/// One parameter slot of the account contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nep6Parameter {
	#[serde(rename = "name")]
	pub param_name: String,
	#[serde(rename = "type")]
	pub param_type: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_reference_file_shape() {
		let json = serde_json::json!({
			"name": "MyWallet",
			"version": "1.0",
			"scrypt": { "n": 16384, "r": 8, "p": 8 },
			"accounts": [{
				"address": "NbTiM6h8r99kpRtb428XcsUk1TzKed2gTc",
				"label": "main",
				"isDefault": true,
				"lock": false,
				"key": "6PYVPVe1fQznphjbUxXP9KZJqPMVnVwCx5s5pr5axRJ8uHkMtZg97eT5kL",
				"contract": {
					"script": "DCECJJQloGtaH45hM/x5r6LCuEML+TJyl/F2dh33no2JKcULQZVEDXg=",
					"parameters": [{ "name": "signature", "type": "Signature" }],
					"deployed": false,
				},
			}],
			"extra": null,
		});
		let wallet: Nep6Wallet = serde_json::from_value(json).unwrap();
		assert_eq!(wallet.accounts.len(), 1);
		assert!(wallet.accounts[0].is_default);
		assert!(wallet.accounts[0].key.is_some());
		assert_eq!(wallet.scrypt, ScryptParamsDef::default());

		// Round-trips through serde without losing fields.
		let back: Nep6Wallet =
			serde_json::from_value(serde_json::to_value(&wallet).unwrap()).unwrap();
		assert_eq!(back, wallet);
	}
}
