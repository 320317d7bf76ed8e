//! Items returned on the VM stack by `invokefunction`/`invokescript`.

use primitive_types::{H160, H256};
use serde::{Deserialize, Serialize};

use crate::neo_types::serde_helpers::base64_decode;
use crate::neo_types::{Address, ScriptHashExtension, TypeError};

/// One value on the result stack of an invocation. Byte strings and
/// buffers carry their payload base64-encoded, as the node sends them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StackItem {
	#[serde(rename = "Any")]
	Any,

	#[serde(rename = "Pointer")]
	Pointer { value: i64 },

	#[serde(rename = "Boolean")]
	Boolean { value: bool },

	#[serde(rename = "Integer")]
	Integer {
		#[serde(with = "integer_as_string")]
		value: i64,
	},

	#[serde(rename = "ByteString")]
	ByteString { value: String },

	#[serde(rename = "Buffer")]
	Buffer { value: String },

	#[serde(rename = "Array")]
	Array { value: Vec<StackItem> },

	#[serde(rename = "Struct")]
	Struct { value: Vec<StackItem> },

	#[serde(rename = "Map")]
	Map { value: Vec<MapEntry> },

	#[serde(rename = "InteropInterface")]
	InteropInterface {
		id: String,
		#[serde(default)]
		interface: Option<String>,
	},
}

/// A key/value pair inside [`StackItem::Map`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapEntry {
	pub key: StackItem,
	pub value: StackItem,
}

impl StackItem {
	/// Boolean view: booleans directly, integers by zero test.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			StackItem::Boolean { value } => Some(*value),
			StackItem::Integer { value } => Some(*value != 0),
			_ => None,
		}
	}

	/// Integer view: integers directly, booleans as 0/1.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			StackItem::Integer { value } => Some(*value),
			StackItem::Boolean { value } => Some(i64::from(*value)),
			_ => None,
		}
	}

	/// Raw bytes of a byte string or buffer.
	pub fn as_bytes(&self) -> Option<Vec<u8>> {
		match self {
			StackItem::ByteString { value } | StackItem::Buffer { value } => {
				base64_decode(value).ok()
			},
			_ => None,
		}
	}

	/// UTF-8 view of a byte string or buffer.
	pub fn as_string(&self) -> Option<String> {
		String::from_utf8(self.as_bytes()?).ok()
	}

	/// Interprets 20 little-endian bytes as a script hash.
	pub fn as_hash160(&self) -> Result<H160, TypeError> {
		let mut bytes = self.as_bytes().ok_or_else(|| {
			TypeError::InvalidArgument("stack item carries no bytes".to_string())
		})?;
		bytes.reverse();
		H160::from_bytes(&bytes)
	}

	/// Interprets the bytes as an address string.
	pub fn as_address(&self) -> Result<Address, TypeError> {
		Ok(ScriptHashExtension::to_address(&self.as_hash160()?))
	}

	/// Interprets 32 little-endian bytes as a `Hash256`.
	pub fn as_hash256(&self) -> Result<H256, TypeError> {
		let mut bytes = self.as_bytes().ok_or_else(|| {
			TypeError::InvalidArgument("stack item carries no bytes".to_string())
		})?;
		bytes.reverse();
		if bytes.len() != 32 {
			return Err(TypeError::InvalidArgument(format!(
				"Hash256 requires 32 bytes, got {}",
				bytes.len()
			)));
		}
		Ok(H256::from_slice(&bytes))
	}

	/// Session/iterator ids of an `InteropInterface` iterator item.
	pub fn as_interop_id(&self) -> Option<&str> {
		match self {
			StackItem::InteropInterface { id, .. } => Some(id),
			_ => None,
		}
	}
}

mod integer_as_string {
	use std::fmt;

	use serde::de::{self, Visitor};
	use serde::{Deserializer, Serializer};

	pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&value.to_string())
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
		struct StringOrInt;

		impl Visitor<'_> for StringOrInt {
			type Value = i64;

			fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
				formatter.write_str("an integer or a decimal string")
			}

			fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
				value.parse().map_err(de::Error::custom)
			}

			fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
				Ok(value)
			}

			fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
				Ok(value as i64)
			}
		}

		deserializer.deserialize_any(StringOrInt)
	}
}
