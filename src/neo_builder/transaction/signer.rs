//! Transaction signers.
//!
//! On the wire a signer is one type: account hash, scope bits, and the
//! allow-lists that accompany the custom scopes. Account and contract
//! signers differ only in how they are constructed and witnessed.

use primitive_types::H160;
use serde::de::Error as DeError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::neo_builder::{WitnessRule, WitnessScope};
use crate::neo_codec::{CodecError, Decoder, Encoder, NeoSerializable, VarSizeTrait};
use crate::neo_config::NeoConstants;
use crate::neo_crypto::Secp256r1PublicKey;
use crate::neo_types::{ScriptHashExtension, TypeError};

/// One transaction signer and its witness scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Signer {
	pub account: H160,
	scopes: Vec<WitnessScope>,
	allowed_contracts: Vec<H160>,
	allowed_groups: Vec<Secp256r1PublicKey>,
	rules: Vec<WitnessRule>,
}

impl Signer {
	/// A signer with an explicit scope set.
	pub fn new(account: H160, scopes: Vec<WitnessScope>) -> Result<Self, TypeError> {
		// Round-trip through the byte form to validate the combination.
		let byte = WitnessScope::combine(&scopes);
		WitnessScope::extract(byte)?;
		Ok(Self { account, scopes, ..Default::default() })
	}

	/// A fee-only signer.
	pub fn none(account: H160) -> Self {
		Self { account, scopes: vec![WitnessScope::None], ..Default::default() }
	}

	/// A signer whose witness holds for the entry contract only.
	pub fn called_by_entry(account: H160) -> Self {
		Self { account, scopes: vec![WitnessScope::CalledByEntry], ..Default::default() }
	}

	/// A signer whose witness holds everywhere.
	pub fn global(account: H160) -> Self {
		Self { account, scopes: vec![WitnessScope::Global], ..Default::default() }
	}

	/// A signer for a deployed contract. Its witness is built from the
	/// contract's `verify` parameters rather than a signature.
	pub fn contract(contract_hash: H160) -> Self {
		Self::called_by_entry(contract_hash)
	}

	pub fn get_scopes(&self) -> &Vec<WitnessScope> {
		&self.scopes
	}

	pub fn get_signer_hash(&self) -> &H160 {
		&self.account
	}

	pub fn scopes_byte(&self) -> u8 {
		WitnessScope::combine(&self.scopes)
	}

	pub fn has_scope(&self, scope: WitnessScope) -> bool {
		self.scopes_byte() & scope.byte() != 0 || (scope == WitnessScope::None && self.scopes_byte() == 0)
	}

	pub fn allowed_contracts(&self) -> &Vec<H160> {
		&self.allowed_contracts
	}

	pub fn allowed_groups(&self) -> &Vec<Secp256r1PublicKey> {
		&self.allowed_groups
	}

	pub fn rules(&self) -> &Vec<WitnessRule> {
		&self.rules
	}

	fn forbid_global(&self, what: &str) -> Result<(), TypeError> {
		if self.has_scope(WitnessScope::Global) {
			return Err(TypeError::InvalidArgument(format!(
				"a Global signer cannot carry {what}"
			)));
		}
		Ok(())
	}

	fn add_scope(&mut self, scope: WitnessScope) {
		if !self.scopes.contains(&scope) {
			self.scopes.retain(|s| *s != WitnessScope::None);
			self.scopes.push(scope);
			self.scopes.sort();
		}
	}

	/// Restricts the witness to the given contracts, adding the
	/// `CustomContracts` scope.
	pub fn set_allowed_contracts(&mut self, contracts: Vec<H160>) -> Result<&mut Self, TypeError> {
		self.forbid_global("allowed contracts")?;
		if self.allowed_contracts.len() + contracts.len() > NeoConstants::MAX_SIGNER_SUBITEMS {
			return Err(TypeError::InvalidArgument(format!(
				"a signer takes at most {} allowed contracts",
				NeoConstants::MAX_SIGNER_SUBITEMS
			)));
		}
		self.add_scope(WitnessScope::CustomContracts);
		self.allowed_contracts.extend(contracts);
		Ok(self)
	}

	/// Restricts the witness to contracts signed by the given group keys,
	/// adding the `CustomGroups` scope.
	pub fn set_allowed_groups(
		&mut self,
		groups: Vec<Secp256r1PublicKey>,
	) -> Result<&mut Self, TypeError> {
		self.forbid_global("allowed groups")?;
		if self.allowed_groups.len() + groups.len() > NeoConstants::MAX_SIGNER_SUBITEMS {
			return Err(TypeError::InvalidArgument(format!(
				"a signer takes at most {} allowed groups",
				NeoConstants::MAX_SIGNER_SUBITEMS
			)));
		}
		self.add_scope(WitnessScope::CustomGroups);
		self.allowed_groups.extend(groups);
		Ok(self)
	}

	/// Attaches witness rules, adding the `WitnessRules` scope.
	pub fn set_rules(&mut self, rules: Vec<WitnessRule>) -> Result<&mut Self, TypeError> {
		self.forbid_global("witness rules")?;
		if self.rules.len() + rules.len() > NeoConstants::MAX_SIGNER_SUBITEMS {
			return Err(TypeError::InvalidArgument(format!(
				"a signer takes at most {} rules",
				NeoConstants::MAX_SIGNER_SUBITEMS
			)));
		}
		self.add_scope(WitnessScope::WitnessRules);
		self.rules.extend(rules);
		Ok(self)
	}
}

impl NeoSerializable for Signer {
	type Error = CodecError;

	fn size(&self) -> usize {
		let mut size = NeoConstants::HASH160_SIZE + 1;
		if self.has_scope(WitnessScope::CustomContracts) {
			size += self.allowed_contracts.var_size();
		}
		if self.has_scope(WitnessScope::CustomGroups) {
			size += crate::neo_codec::var_int_size(self.allowed_groups.len())
				+ self.allowed_groups.len() * NeoConstants::PUBLIC_KEY_SIZE_COMPRESSED;
		}
		if self.has_scope(WitnessScope::WitnessRules) {
			size += crate::neo_codec::var_int_size(self.rules.len())
				+ self.rules.iter().map(|r| r.size()).sum::<usize>();
		}
		size
	}

	fn encode(&self, writer: &mut Encoder) {
		self.account.encode(writer);
		writer.write_u8(self.scopes_byte());
		if self.has_scope(WitnessScope::CustomContracts) {
			writer.write_serializable_variable_list(&self.allowed_contracts);
		}
		if self.has_scope(WitnessScope::CustomGroups) {
			writer.write_var_int(self.allowed_groups.len() as u64);
			for group in &self.allowed_groups {
				writer.write_bytes(&group.get_encoded(true));
			}
		}
		if self.has_scope(WitnessScope::WitnessRules) {
			writer.write_serializable_variable_list(&self.rules);
		}
	}

	fn decode(reader: &mut Decoder<'_>) -> Result<Self, Self::Error> {
		let account = H160::decode(reader)?;
		let scopes_byte = reader.read_u8()?;
		let scopes = WitnessScope::extract(scopes_byte)
			.map_err(|e| CodecError::InvalidData(e.to_string()))?;
		let mut signer = Signer { account, scopes, ..Default::default() };

		if signer.has_scope(WitnessScope::CustomContracts) {
			signer.allowed_contracts = reader.read_serializable_list::<H160>()?;
			if signer.allowed_contracts.len() > NeoConstants::MAX_SIGNER_SUBITEMS {
				return Err(CodecError::InvalidLength(format!(
					"{} allowed contracts",
					signer.allowed_contracts.len()
				)));
			}
		}
		if signer.has_scope(WitnessScope::CustomGroups) {
			let count = reader.read_var_int()?;
			if count as usize > NeoConstants::MAX_SIGNER_SUBITEMS {
				return Err(CodecError::InvalidLength(format!("{count} allowed groups")));
			}
			for _ in 0..count {
				let encoded = reader.read_encoded_ec_point()?;
				signer.allowed_groups.push(
					Secp256r1PublicKey::from_bytes(&encoded)
						.map_err(|e| CodecError::InvalidData(e.to_string()))?,
				);
			}
		}
		if signer.has_scope(WitnessScope::WitnessRules) {
			signer.rules = reader.read_serializable_list::<WitnessRule>()?;
			if signer.rules.len() > NeoConstants::MAX_SIGNER_SUBITEMS {
				return Err(CodecError::InvalidLength(format!("{} rules", signer.rules.len())));
			}
		}
		Ok(signer)
	}
}

impl Serialize for Signer {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut entries = 2;
		entries += usize::from(!self.allowed_contracts.is_empty());
		entries += usize::from(!self.allowed_groups.is_empty());
		entries += usize::from(!self.rules.is_empty());
		let mut map = serializer.serialize_map(Some(entries))?;
		map.serialize_entry("account", &ScriptHashExtension::to_hex(&self.account))?;
		let scopes: Vec<String> = self.scopes.iter().map(|s| s.to_string()).collect();
		map.serialize_entry("scopes", &scopes)?;
		if !self.allowed_contracts.is_empty() {
			let contracts: Vec<String> =
				self.allowed_contracts.iter().map(ScriptHashExtension::to_hex).collect();
			map.serialize_entry("allowedcontracts", &contracts)?;
		}
		if !self.allowed_groups.is_empty() {
			let groups: Vec<String> =
				self.allowed_groups.iter().map(|g| g.get_encoded_compressed_hex()).collect();
			map.serialize_entry("allowedgroups", &groups)?;
		}
		if !self.rules.is_empty() {
			map.serialize_entry("rules", &self.rules)?;
		}
		map.end()
	}
}

impl<'de> Deserialize<'de> for Signer {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let json = Value::deserialize(deserializer)?;
		let account = json
			.get("account")
			.and_then(Value::as_str)
			.ok_or_else(|| D::Error::custom("signer missing 'account'"))?;
		let account = H160::from_hex(account).map_err(D::Error::custom)?;

		let scopes = match json.get("scopes") {
			Some(Value::Array(items)) => {
				let mut scopes = Vec::with_capacity(items.len());
				for item in items {
					let name = item
						.as_str()
						.ok_or_else(|| D::Error::custom("scope must be a string"))?;
					scopes.push(name.trim().parse().map_err(D::Error::custom)?);
				}
				scopes
			},
			// Nodes render combined scopes as one comma-joined string.
			Some(Value::String(joined)) => {
				let mut scopes = Vec::new();
				for name in joined.split(',') {
					scopes.push(name.trim().parse().map_err(D::Error::custom)?);
				}
				scopes
			},
			_ => return Err(D::Error::custom("signer missing 'scopes'")),
		};

		let mut signer = Signer::new(account, scopes).map_err(D::Error::custom)?;
		if let Some(contracts) = json.get("allowedcontracts").and_then(Value::as_array) {
			for contract in contracts {
				let hash = contract
					.as_str()
					.ok_or_else(|| D::Error::custom("allowed contract must be a string"))?;
				signer.allowed_contracts.push(H160::from_hex(hash).map_err(D::Error::custom)?);
			}
		}
		if let Some(groups) = json.get("allowedgroups").and_then(Value::as_array) {
			for group in groups {
				let key = group
					.as_str()
					.ok_or_else(|| D::Error::custom("allowed group must be a string"))?;
				signer.allowed_groups.push(
					Secp256r1PublicKey::from_encoded(key).map_err(D::Error::custom)?,
				);
			}
		}
		if let Some(rules) = json.get("rules") {
			signer.rules = serde_json::from_value(rules.clone()).map_err(D::Error::custom)?;
		}
		Ok(signer)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::neo_builder::{WitnessAction, WitnessCondition};

	fn account() -> H160 {
		H160::from_hex("23ba2703c53263e8d6e522dc32203339dcd8eee9").unwrap()
	}

	#[test]
	fn wire_form_writes_sublists_per_scope() {
		let mut signer = Signer::called_by_entry(account());
		signer
			.set_allowed_contracts(vec![
				H160::from_hex("d2a4cff31913016155e38e474a2c06d08be276cf").unwrap()
			])
			.unwrap();

		let bytes = signer.to_array();
		assert_eq!(bytes.len(), signer.size());
		// account, scope byte (CalledByEntry | CustomContracts), count, hash
		assert_eq!(bytes[20], 0x11);
		assert_eq!(bytes[21], 1);

		let mut reader = Decoder::new(&bytes);
		let decoded = Signer::decode(&mut reader).unwrap();
		assert_eq!(decoded, signer);
	}

	#[test]
	fn fee_only_signer_has_zero_scope_byte() {
		let signer = Signer::none(account());
		assert_eq!(signer.scopes_byte(), 0x00);
		let bytes = signer.to_array();
		assert_eq!(bytes.len(), 21);

		let mut reader = Decoder::new(&bytes);
		assert_eq!(Signer::decode(&mut reader).unwrap(), signer);
	}

	#[test]
	fn global_signer_rejects_sublists() {
		let mut signer = Signer::global(account());
		assert!(signer.set_allowed_contracts(vec![account()]).is_err());
		assert!(signer.set_allowed_groups(vec![]).is_err());
		assert!(signer.set_rules(vec![]).is_err());
	}

	#[test]
	fn subitem_limits_are_enforced() {
		let mut signer = Signer::called_by_entry(account());
		let contracts: Vec<H160> = (0..17).map(H160::from_low_u64_be).collect();
		assert!(signer.set_allowed_contracts(contracts).is_err());

		let mut signer = Signer::called_by_entry(account());
		let rules: Vec<WitnessRule> = (0..17)
			.map(|_| WitnessRule::new(WitnessAction::Allow, WitnessCondition::CalledByEntry))
			.collect();
		assert!(signer.set_rules(rules).is_err());
	}

	#[test]
	fn json_uses_scope_string_array() {
		let mut signer = Signer::called_by_entry(account());
		signer
			.set_rules(vec![WitnessRule::new(
				WitnessAction::Allow,
				WitnessCondition::CalledByEntry,
			)])
			.unwrap();

		let json = serde_json::to_value(&signer).unwrap();
		assert_eq!(json["account"], "23ba2703c53263e8d6e522dc32203339dcd8eee9");
		assert_eq!(
			json["scopes"],
			serde_json::json!(["CalledByEntry", "WitnessRules"])
		);
		assert!(json.get("allowedcontracts").is_none());

		let back: Signer = serde_json::from_value(json).unwrap();
		assert_eq!(back, signer);
	}

	#[test]
	fn json_accepts_comma_joined_scopes() {
		let json = serde_json::json!({
			"account": "23ba2703c53263e8d6e522dc32203339dcd8eee9",
			"scopes": "CalledByEntry, CustomContracts",
			"allowedcontracts": ["d2a4cff31913016155e38e474a2c06d08be276cf"],
		});
		let signer: Signer = serde_json::from_value(json).unwrap();
		assert!(signer.has_scope(WitnessScope::CalledByEntry));
		assert!(signer.has_scope(WitnessScope::CustomContracts));
		assert_eq!(signer.allowed_contracts().len(), 1);
	}

	#[test]
	fn sublist_order_is_insertion_order() {
		let mut signer = Signer::called_by_entry(account());
		let first = H160::from_low_u64_be(1);
		let second = H160::from_low_u64_be(2);
		signer.set_allowed_contracts(vec![second, first]).unwrap();
		assert_eq!(signer.allowed_contracts(), &vec![second, first]);

		let bytes = signer.to_array();
		let mut reader = Decoder::new(&bytes);
		let decoded = Signer::decode(&mut reader).unwrap();
		assert_eq!(decoded.allowed_contracts(), &vec![second, first]);
	}
}
