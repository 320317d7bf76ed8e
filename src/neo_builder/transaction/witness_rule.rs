//! Witness rules: the recursive conditions a `WitnessRules`-scoped signer
//! attaches to its witness.

use primitive_types::H160;
use serde::de::Error as DeError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::neo_codec::{CodecError, Decoder, Encoder, NeoSerializable};
use crate::neo_crypto::Secp256r1PublicKey;
use crate::neo_types::{Hash256Extension, ScriptHashExtension, TypeError};

/// Whether a matched condition admits or blocks the witness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WitnessAction {
	Deny,
	Allow,
}

impl WitnessAction {
	pub fn byte(&self) -> u8 {
		match self {
			WitnessAction::Deny => 0x00,
			WitnessAction::Allow => 0x01,
		}
	}

	pub fn from_byte(byte: u8) -> Result<Self, CodecError> {
		match byte {
			0x00 => Ok(WitnessAction::Deny),
			0x01 => Ok(WitnessAction::Allow),
			_ => Err(CodecError::InvalidDiscriminant(format!("witness action 0x{byte:02x}"))),
		}
	}
}

/// A predicate over the execution context of a witness check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WitnessCondition {
	Boolean(bool),
	Not(Box<WitnessCondition>),
	And(Vec<WitnessCondition>),
	Or(Vec<WitnessCondition>),
	ScriptHash(H160),
	Group(Secp256r1PublicKey),
	CalledByEntry,
	CalledByContract(H160),
	CalledByGroup(Secp256r1PublicKey),
}

impl WitnessCondition {
	pub fn type_byte(&self) -> u8 {
		match self {
			WitnessCondition::Boolean(_) => 0x00,
			WitnessCondition::Not(_) => 0x01,
			WitnessCondition::And(_) => 0x02,
			WitnessCondition::Or(_) => 0x03,
			WitnessCondition::ScriptHash(_) => 0x18,
			WitnessCondition::Group(_) => 0x19,
			WitnessCondition::CalledByEntry => 0x20,
			WitnessCondition::CalledByContract(_) => 0x28,
			WitnessCondition::CalledByGroup(_) => 0x29,
		}
	}

	pub fn type_name(&self) -> &'static str {
		match self {
			WitnessCondition::Boolean(_) => "Boolean",
			WitnessCondition::Not(_) => "Not",
			WitnessCondition::And(_) => "And",
			WitnessCondition::Or(_) => "Or",
			WitnessCondition::ScriptHash(_) => "ScriptHash",
			WitnessCondition::Group(_) => "Group",
			WitnessCondition::CalledByEntry => "CalledByEntry",
			WitnessCondition::CalledByContract(_) => "CalledByContract",
			WitnessCondition::CalledByGroup(_) => "CalledByGroup",
		}
	}
}

impl NeoSerializable for WitnessCondition {
	type Error = CodecError;

	fn size(&self) -> usize {
		1 + match self {
			WitnessCondition::Boolean(_) => 1,
			WitnessCondition::Not(inner) => inner.size(),
			WitnessCondition::And(conditions) | WitnessCondition::Or(conditions) => {
				crate::neo_codec::var_int_size(conditions.len())
					+ conditions.iter().map(|c| c.size()).sum::<usize>()
			},
			WitnessCondition::ScriptHash(_) | WitnessCondition::CalledByContract(_) => 20,
			WitnessCondition::Group(_) | WitnessCondition::CalledByGroup(_) => 33,
			WitnessCondition::CalledByEntry => 0,
		}
	}

	fn encode(&self, writer: &mut Encoder) {
		writer.write_u8(self.type_byte());
		match self {
			WitnessCondition::Boolean(value) => writer.write_bool(*value),
			WitnessCondition::Not(inner) => inner.encode(writer),
			WitnessCondition::And(conditions) | WitnessCondition::Or(conditions) => {
				writer.write_var_int(conditions.len() as u64);
				for condition in conditions {
					condition.encode(writer);
				}
			},
			WitnessCondition::ScriptHash(hash) | WitnessCondition::CalledByContract(hash) => {
				hash.encode(writer)
			},
			WitnessCondition::Group(key) | WitnessCondition::CalledByGroup(key) => {
				writer.write_bytes(&key.get_encoded(true))
			},
			WitnessCondition::CalledByEntry => {},
		}
	}

	fn decode(reader: &mut Decoder<'_>) -> Result<Self, Self::Error> {
		let type_byte = reader.read_u8()?;
		let condition = match type_byte {
			0x00 => WitnessCondition::Boolean(reader.read_bool()?),
			0x01 => WitnessCondition::Not(Box::new(WitnessCondition::decode(reader)?)),
			0x02 | 0x03 => {
				let count = reader.read_var_int()?;
				let mut conditions = Vec::with_capacity(count as usize);
				for _ in 0..count {
					conditions.push(WitnessCondition::decode(reader)?);
				}
				if type_byte == 0x02 {
					WitnessCondition::And(conditions)
				} else {
					WitnessCondition::Or(conditions)
				}
			},
			0x18 => WitnessCondition::ScriptHash(H160::decode(reader)?),
			0x19 => WitnessCondition::Group(read_public_key(reader)?),
			0x20 => WitnessCondition::CalledByEntry,
			0x28 => WitnessCondition::CalledByContract(H160::decode(reader)?),
			0x29 => WitnessCondition::CalledByGroup(read_public_key(reader)?),
			_ => {
				return Err(CodecError::InvalidDiscriminant(format!(
					"witness condition 0x{type_byte:02x}"
				)))
			},
		};
		Ok(condition)
	}
}

fn read_public_key(reader: &mut Decoder<'_>) -> Result<Secp256r1PublicKey, CodecError> {
	let encoded = reader.read_encoded_ec_point()?;
	Secp256r1PublicKey::from_bytes(&encoded).map_err(|e| CodecError::InvalidData(e.to_string()))
}

impl Serialize for WitnessCondition {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let entries = match self {
			WitnessCondition::CalledByEntry => 1,
			_ => 2,
		};
		let mut map = serializer.serialize_map(Some(entries))?;
		map.serialize_entry("type", self.type_name())?;
		match self {
			WitnessCondition::Boolean(value) => map.serialize_entry("expression", value)?,
			WitnessCondition::Not(inner) => map.serialize_entry("expression", inner)?,
			WitnessCondition::And(conditions) | WitnessCondition::Or(conditions) => {
				map.serialize_entry("expressions", conditions)?
			},
			WitnessCondition::ScriptHash(hash) | WitnessCondition::CalledByContract(hash) => {
				map.serialize_entry("hash", &ScriptHashExtension::to_hex(hash))?
			},
			WitnessCondition::Group(key) | WitnessCondition::CalledByGroup(key) => {
				map.serialize_entry("group", &key.get_encoded_compressed_hex())?
			},
			WitnessCondition::CalledByEntry => {},
		}
		map.end()
	}
}

impl<'de> Deserialize<'de> for WitnessCondition {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let json = Value::deserialize(deserializer)?;
		condition_from_json(&json).map_err(D::Error::custom)
	}
}

fn condition_from_json(json: &Value) -> Result<WitnessCondition, TypeError> {
	let type_name = json
		.get("type")
		.and_then(Value::as_str)
		.ok_or_else(|| TypeError::InvalidArgument("condition missing 'type'".to_string()))?;
	let condition = match type_name {
		"Boolean" => {
			let value = match json.get("expression") {
				Some(Value::Bool(b)) => *b,
				Some(Value::String(s)) => s == "true",
				_ => return Err(TypeError::InvalidArgument("Boolean expression".to_string())),
			};
			WitnessCondition::Boolean(value)
		},
		"Not" => {
			let inner = json
				.get("expression")
				.ok_or_else(|| TypeError::InvalidArgument("Not expression".to_string()))?;
			WitnessCondition::Not(Box::new(condition_from_json(inner)?))
		},
		"And" | "Or" => {
			let items = json
				.get("expressions")
				.and_then(Value::as_array)
				.ok_or_else(|| TypeError::InvalidArgument("And/Or expressions".to_string()))?;
			let mut conditions = Vec::with_capacity(items.len());
			for item in items {
				conditions.push(condition_from_json(item)?);
			}
			if type_name == "And" {
				WitnessCondition::And(conditions)
			} else {
				WitnessCondition::Or(conditions)
			}
		},
		"ScriptHash" | "CalledByContract" => {
			let hash = json
				.get("hash")
				.and_then(Value::as_str)
				.ok_or_else(|| TypeError::InvalidArgument("condition hash".to_string()))?;
			let hash = H160::from_hex(hash)?;
			if type_name == "ScriptHash" {
				WitnessCondition::ScriptHash(hash)
			} else {
				WitnessCondition::CalledByContract(hash)
			}
		},
		"Group" | "CalledByGroup" => {
			let group = json
				.get("group")
				.and_then(Value::as_str)
				.ok_or_else(|| TypeError::InvalidArgument("condition group".to_string()))?;
			let key = Secp256r1PublicKey::from_encoded(group)
				.map_err(|e| TypeError::InvalidArgument(e.to_string()))?;
			if type_name == "Group" {
				WitnessCondition::Group(key)
			} else {
				WitnessCondition::CalledByGroup(key)
			}
		},
		"CalledByEntry" => WitnessCondition::CalledByEntry,
		_ => {
			return Err(TypeError::InvalidArgument(format!("unknown condition type {type_name}")))
		},
	};
	Ok(condition)
}

/// One rule: an action applied when its condition matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WitnessRule {
	pub action: WitnessAction,
	pub condition: WitnessCondition,
}

impl WitnessRule {
	pub fn new(action: WitnessAction, condition: WitnessCondition) -> Self {
		Self { action, condition }
	}
}

impl NeoSerializable for WitnessRule {
	type Error = CodecError;

	fn size(&self) -> usize {
		1 + self.condition.size()
	}

	fn encode(&self, writer: &mut Encoder) {
		writer.write_u8(self.action.byte());
		self.condition.encode(writer);
	}

	fn decode(reader: &mut Decoder<'_>) -> Result<Self, Self::Error> {
		let action = WitnessAction::from_byte(reader.read_u8()?)?;
		let condition = WitnessCondition::decode(reader)?;
		Ok(Self { action, condition })
	}
}
