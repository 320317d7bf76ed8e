//! Parameters passed to contract invocations.
//!
//! A [`ContractParameter`] is a tagged value whose JSON form is
//! `{"type": <TagName>, "value": <payload>}`. Map keys carry a total
//! structural order (tag first, then value) so that map emission and JSON
//! output are deterministic.

use std::cmp::Ordering;

use primitive_types::{H160, H256};
use serde::de::Error as DeError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::neo_crypto::Secp256r1PublicKey;
use crate::neo_types::{Hash256Extension, ScriptHashExtension, TypeError};

/// The tag of a [`ContractParameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContractParameterType {
	Any,
	Boolean,
	Integer,
	ByteArray,
	String,
	Hash160,
	Hash256,
	PublicKey,
	Signature,
	Array,
	Map,
	InteropInterface,
	Void,
}

impl ContractParameterType {
	/// Wire byte of the tag.
	pub fn as_byte(&self) -> u8 {
		match self {
			ContractParameterType::Any => 0x00,
			ContractParameterType::Boolean => 0x10,
			ContractParameterType::Integer => 0x11,
			ContractParameterType::ByteArray => 0x12,
			ContractParameterType::String => 0x13,
			ContractParameterType::Hash160 => 0x14,
			ContractParameterType::Hash256 => 0x15,
			ContractParameterType::PublicKey => 0x16,
			ContractParameterType::Signature => 0x17,
			ContractParameterType::Array => 0x20,
			ContractParameterType::Map => 0x22,
			ContractParameterType::InteropInterface => 0x30,
			ContractParameterType::Void => 0xFF,
		}
	}

	/// JSON tag name.
	pub fn as_str(&self) -> &'static str {
		match self {
			ContractParameterType::Any => "Any",
			ContractParameterType::Boolean => "Boolean",
			ContractParameterType::Integer => "Integer",
			ContractParameterType::ByteArray => "ByteArray",
			ContractParameterType::String => "String",
			ContractParameterType::Hash160 => "Hash160",
			ContractParameterType::Hash256 => "Hash256",
			ContractParameterType::PublicKey => "PublicKey",
			ContractParameterType::Signature => "Signature",
			ContractParameterType::Array => "Array",
			ContractParameterType::Map => "Map",
			ContractParameterType::InteropInterface => "InteropInterface",
			ContractParameterType::Void => "Void",
		}
	}

	/// Parses a JSON tag name.
	pub fn from_str_name(name: &str) -> Result<Self, TypeError> {
		let typ = match name {
			"Any" => ContractParameterType::Any,
			"Boolean" => ContractParameterType::Boolean,
			"Integer" => ContractParameterType::Integer,
			"ByteArray" => ContractParameterType::ByteArray,
			"String" => ContractParameterType::String,
			"Hash160" => ContractParameterType::Hash160,
			"Hash256" => ContractParameterType::Hash256,
			"PublicKey" => ContractParameterType::PublicKey,
			"Signature" => ContractParameterType::Signature,
			"Array" => ContractParameterType::Array,
			"Map" => ContractParameterType::Map,
			"InteropInterface" => ContractParameterType::InteropInterface,
			"Void" => ContractParameterType::Void,
			_ => return Err(TypeError::InvalidArgument(format!("unknown parameter type {name}"))),
		};
		Ok(typ)
	}
}

/// Payload of a [`ContractParameter`]; absent for `Any`, `Void` and
/// `InteropInterface`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParameterValue {
	Boolean(bool),
	Integer(i64),
	ByteArray(Vec<u8>),
	String(String),
	H160(H160),
	H256(H256),
	PublicKey(Vec<u8>),
	Signature(Vec<u8>),
	Array(Vec<ContractParameter>),
	Map(ContractParameterMap),
}

/// A map parameter: key/value pairs kept sorted by the structural order of
/// their keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContractParameterMap(pub Vec<(ContractParameter, ContractParameter)>);

impl ContractParameterMap {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	/// Inserts a pair, replacing an existing entry with an equal key and
	/// keeping the entries sorted by key.
	pub fn insert(&mut self, key: ContractParameter, value: ContractParameter) {
		match self.0.binary_search_by(|(k, _)| k.cmp(&key)) {
			Ok(pos) => self.0[pos].1 = value,
			Err(pos) => self.0.insert(pos, (key, value)),
		}
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &(ContractParameter, ContractParameter)> {
		self.0.iter()
	}
}

/// A tagged contract-invocation parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractParameter {
	/// Optional name, carried only in manifest-shaped JSON.
	pub name: Option<String>,
	typ: ContractParameterType,
	pub value: Option<ParameterValue>,
}

impl ContractParameter {
	fn with_value(typ: ContractParameterType, value: ParameterValue) -> Self {
		Self { name: None, typ, value: Some(value) }
	}

	pub fn get_type(&self) -> ContractParameterType {
		self.typ
	}

	pub fn any() -> Self {
		Self { name: None, typ: ContractParameterType::Any, value: None }
	}

	pub fn void() -> Self {
		Self { name: None, typ: ContractParameterType::Void, value: None }
	}

	pub fn bool(value: bool) -> Self {
		Self::with_value(ContractParameterType::Boolean, ParameterValue::Boolean(value))
	}

	pub fn integer(value: i64) -> Self {
		Self::with_value(ContractParameterType::Integer, ParameterValue::Integer(value))
	}

	pub fn byte_array(bytes: Vec<u8>) -> Self {
		Self::with_value(ContractParameterType::ByteArray, ParameterValue::ByteArray(bytes))
	}

	pub fn string(value: impl Into<String>) -> Self {
		Self::with_value(ContractParameterType::String, ParameterValue::String(value.into()))
	}

	pub fn h160(hash: &H160) -> Self {
		Self::with_value(ContractParameterType::Hash160, ParameterValue::H160(*hash))
	}

	pub fn h256(hash: &H256) -> Self {
		Self::with_value(ContractParameterType::Hash256, ParameterValue::H256(*hash))
	}

	pub fn public_key(key: &Secp256r1PublicKey) -> Self {
		Self::with_value(
			ContractParameterType::PublicKey,
			ParameterValue::PublicKey(key.get_encoded(true)),
		)
	}

	pub fn signature(signature: Vec<u8>) -> Result<Self, TypeError> {
		if signature.len() != 64 {
			return Err(TypeError::InvalidArgument(format!(
				"signature must be 64 bytes, got {}",
				signature.len()
			)));
		}
		Ok(Self::with_value(ContractParameterType::Signature, ParameterValue::Signature(signature)))
	}

	pub fn array(values: Vec<ContractParameter>) -> Self {
		Self::with_value(ContractParameterType::Array, ParameterValue::Array(values))
	}

	pub fn map(map: ContractParameterMap) -> Self {
		Self::with_value(ContractParameterType::Map, ParameterValue::Map(map))
	}
}

impl PartialOrd for ContractParameter {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for ContractParameter {
	fn cmp(&self, other: &Self) -> Ordering {
		self.typ
			.as_byte()
			.cmp(&other.typ.as_byte())
			.then_with(|| self.value.cmp(&other.value))
	}
}

impl From<bool> for ContractParameter {
	fn from(value: bool) -> Self {
		Self::bool(value)
	}
}

impl From<i32> for ContractParameter {
	fn from(value: i32) -> Self {
		Self::integer(value as i64)
	}
}

impl From<i64> for ContractParameter {
	fn from(value: i64) -> Self {
		Self::integer(value)
	}
}

impl From<&str> for ContractParameter {
	fn from(value: &str) -> Self {
		Self::string(value)
	}
}

impl From<String> for ContractParameter {
	fn from(value: String) -> Self {
		Self::string(value)
	}
}

impl From<&H160> for ContractParameter {
	fn from(value: &H160) -> Self {
		Self::h160(value)
	}
}

impl From<&[u8]> for ContractParameter {
	fn from(value: &[u8]) -> Self {
		Self::byte_array(value.to_vec())
	}
}

impl Serialize for ContractParameter {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut entries = 1 + usize::from(self.value.is_some()) + usize::from(self.name.is_some());
		if matches!(self.typ, ContractParameterType::Any) && self.value.is_none() {
			entries += 1; // explicit null value
		}
		let mut map = serializer.serialize_map(Some(entries))?;
		if let Some(name) = &self.name {
			map.serialize_entry("name", name)?;
		}
		map.serialize_entry("type", self.typ.as_str())?;
		match &self.value {
			None => {
				if matches!(self.typ, ContractParameterType::Any) {
					map.serialize_entry("value", &Value::Null)?;
				}
			},
			Some(ParameterValue::Boolean(b)) => map.serialize_entry("value", b)?,
			Some(ParameterValue::Integer(i)) => map.serialize_entry("value", &i.to_string())?,
			Some(ParameterValue::ByteArray(bytes)) | Some(ParameterValue::Signature(bytes))
			| Some(ParameterValue::PublicKey(bytes)) => {
				map.serialize_entry("value", &hex::encode(bytes))?
			},
			Some(ParameterValue::String(s)) => map.serialize_entry("value", s)?,
			Some(ParameterValue::H160(h)) => {
				map.serialize_entry("value", &ScriptHashExtension::to_hex(h))?
			},
			Some(ParameterValue::H256(h)) => {
				map.serialize_entry("value", &Hash256Extension::to_hex(h))?
			},
			Some(ParameterValue::Array(values)) => map.serialize_entry("value", values)?,
			Some(ParameterValue::Map(entries)) => {
				#[derive(Serialize)]
				struct Entry<'a> {
					key: &'a ContractParameter,
					value: &'a ContractParameter,
				}
				let entries: Vec<Entry<'_>> =
					entries.iter().map(|(key, value)| Entry { key, value }).collect();
				map.serialize_entry("value", &entries)?
			},
		}
		map.end()
	}
}

impl<'de> Deserialize<'de> for ContractParameter {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let json = Value::deserialize(deserializer)?;
		parameter_from_json(&json).map_err(D::Error::custom)
	}
}

fn parameter_from_json(json: &Value) -> Result<ContractParameter, TypeError> {
	let tag = json
		.get("type")
		.and_then(Value::as_str)
		.ok_or_else(|| TypeError::InvalidArgument("parameter JSON missing 'type'".to_string()))?;
	let typ = ContractParameterType::from_str_name(tag)?;
	let name = json.get("name").and_then(Value::as_str).map(str::to_string);
	let value = json.get("value");

	let mut parameter = match (typ, value) {
		(_, None) | (_, Some(Value::Null)) => ContractParameter { name: None, typ, value: None },
		(ContractParameterType::Boolean, Some(v)) => ContractParameter::bool(
			v.as_bool()
				.ok_or_else(|| TypeError::InvalidArgument("Boolean value".to_string()))?,
		),
		(ContractParameterType::Integer, Some(v)) => {
			let n = match v {
				Value::String(s) => s
					.parse::<i64>()
					.map_err(|e| TypeError::InvalidArgument(format!("Integer value: {e}")))?,
				Value::Number(n) => n
					.as_i64()
					.ok_or_else(|| TypeError::InvalidArgument("Integer value".to_string()))?,
				_ => return Err(TypeError::InvalidArgument("Integer value".to_string())),
			};
			ContractParameter::integer(n)
		},
		(ContractParameterType::ByteArray, Some(v)) => {
			ContractParameter::byte_array(hex_value(v)?)
		},
		(ContractParameterType::Signature, Some(v)) => ContractParameter::signature(hex_value(v)?)?,
		(ContractParameterType::PublicKey, Some(v)) => ContractParameter {
			name: None,
			typ,
			value: Some(ParameterValue::PublicKey(hex_value(v)?)),
		},
		(ContractParameterType::String, Some(v)) => ContractParameter::string(
			v.as_str()
				.ok_or_else(|| TypeError::InvalidArgument("String value".to_string()))?,
		),
		(ContractParameterType::Hash160, Some(v)) => {
			let s = v
				.as_str()
				.ok_or_else(|| TypeError::InvalidArgument("Hash160 value".to_string()))?;
			ContractParameter::h160(&H160::from_hex(s)?)
		},
		(ContractParameterType::Hash256, Some(v)) => {
			let s = v
				.as_str()
				.ok_or_else(|| TypeError::InvalidArgument("Hash256 value".to_string()))?;
			ContractParameter::h256(&H256::from_hex(s)?)
		},
		(ContractParameterType::Array, Some(v)) => {
			let items = v
				.as_array()
				.ok_or_else(|| TypeError::InvalidArgument("Array value".to_string()))?;
			let mut values = Vec::with_capacity(items.len());
			for item in items {
				values.push(parameter_from_json(item)?);
			}
			ContractParameter::array(values)
		},
		(ContractParameterType::Map, Some(v)) => {
			let items = v
				.as_array()
				.ok_or_else(|| TypeError::InvalidArgument("Map value".to_string()))?;
			let mut map = ContractParameterMap::new();
			for item in items {
				let key = item
					.get("key")
					.ok_or_else(|| TypeError::InvalidArgument("Map entry key".to_string()))?;
				let value = item
					.get("value")
					.ok_or_else(|| TypeError::InvalidArgument("Map entry value".to_string()))?;
				map.insert(parameter_from_json(key)?, parameter_from_json(value)?);
			}
			ContractParameter::map(map)
		},
		(_, Some(_)) => ContractParameter { name: None, typ, value: None },
	};
	parameter.name = name;
	Ok(parameter)
}

fn hex_value(value: &Value) -> Result<Vec<u8>, TypeError> {
	let s = value
		.as_str()
		.ok_or_else(|| TypeError::InvalidArgument("expected hex string".to_string()))?;
	Ok(hex::decode(s.trim_start_matches("0x"))?)
}
