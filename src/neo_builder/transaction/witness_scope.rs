//! Witness scopes: the bitmask controlling where a signer's witness may
//! be consulted during contract execution.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::neo_types::TypeError;

/// One scope flag of a signer.
#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	PartialOrd,
	Ord,
	Hash,
	Serialize,
	Deserialize,
	Display,
	EnumString,
)]
pub enum WitnessScope {
	/// Fee-only: the witness pays fees and verifies nothing else.
	#[serde(rename = "None")]
	#[strum(serialize = "None")]
	None,
	/// Valid only for the entry-point contract.
	#[serde(rename = "CalledByEntry")]
	#[strum(serialize = "CalledByEntry")]
	CalledByEntry,
	/// Valid for an explicit contract allow-list.
	#[serde(rename = "CustomContracts")]
	#[strum(serialize = "CustomContracts")]
	CustomContracts,
	/// Valid for contracts signed by an allowed group key.
	#[serde(rename = "CustomGroups")]
	#[strum(serialize = "CustomGroups")]
	CustomGroups,
	/// Governed by explicit witness rules.
	#[serde(rename = "WitnessRules")]
	#[strum(serialize = "WitnessRules")]
	WitnessRules,
	/// Valid everywhere. Cannot be combined with `CalledByEntry`.
	#[serde(rename = "Global")]
	#[strum(serialize = "Global")]
	Global,
}

impl WitnessScope {
	/// Bit value of this scope.
	pub fn byte(&self) -> u8 {
		match self {
			WitnessScope::None => 0x00,
			WitnessScope::CalledByEntry => 0x01,
			WitnessScope::CustomContracts => 0x10,
			WitnessScope::CustomGroups => 0x20,
			WitnessScope::WitnessRules => 0x40,
			WitnessScope::Global => 0x80,
		}
	}

	/// ORs a scope set into its wire byte.
	pub fn combine(scopes: &[WitnessScope]) -> u8 {
		scopes.iter().fold(0, |bits, scope| bits | scope.byte())
	}

	/// Splits a wire byte back into scopes. `0x00` is the fee-only set;
	/// `Global` combined with `CalledByEntry` is rejected.
	pub fn extract(byte: u8) -> Result<Vec<WitnessScope>, TypeError> {
		const KNOWN_BITS: u8 = 0x01 | 0x10 | 0x20 | 0x40 | 0x80;
		if byte == 0 {
			return Ok(vec![WitnessScope::None]);
		}
		if byte & !KNOWN_BITS != 0 {
			return Err(TypeError::InvalidArgument(format!("unknown scope bits 0x{byte:02x}")));
		}
		if byte & WitnessScope::Global.byte() != 0 && byte & WitnessScope::CalledByEntry.byte() != 0
		{
			return Err(TypeError::InvalidArgument(
				"Global scope cannot be combined with CalledByEntry".to_string(),
			));
		}
		let mut scopes = Vec::new();
		for scope in [
			WitnessScope::CalledByEntry,
			WitnessScope::CustomContracts,
			WitnessScope::CustomGroups,
			WitnessScope::WitnessRules,
			WitnessScope::Global,
		] {
			if byte & scope.byte() != 0 {
				scopes.push(scope);
			}
		}
		Ok(scopes)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn combine_then_extract_is_identity() {
		let sets: &[&[WitnessScope]] = &[
			&[WitnessScope::None],
			&[WitnessScope::CalledByEntry],
			&[WitnessScope::Global],
			&[WitnessScope::CalledByEntry, WitnessScope::CustomContracts],
			&[WitnessScope::CustomContracts, WitnessScope::CustomGroups, WitnessScope::WitnessRules],
			&[WitnessScope::CustomGroups, WitnessScope::Global],
		];
		for set in sets {
			let byte = WitnessScope::combine(set);
			assert_eq!(&WitnessScope::extract(byte).unwrap(), set, "set {set:?}");
		}
	}

	#[test]
	fn global_with_called_by_entry_is_rejected() {
		assert!(WitnessScope::extract(0x81).is_err());
	}

	#[test]
	fn unknown_bits_are_rejected() {
		assert!(WitnessScope::extract(0x02).is_err());
		assert!(WitnessScope::extract(0x08).is_err());
	}

	#[test]
	fn string_forms() {
		assert_eq!(WitnessScope::CalledByEntry.to_string(), "CalledByEntry");
		assert_eq!("Global".parse::<WitnessScope>().unwrap(), WitnessScope::Global);
	}
}
