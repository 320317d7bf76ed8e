//! Serde helpers for the hex and base64 field shapes Neo nodes speak.

use primitive_types::{H160, H256};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serializer};

use crate::neo_types::{Hash256Extension, ScriptHashExtension};

/// Encoding of bytes into the base64 transport form.
pub trait Base64Encode {
	fn to_base64(&self) -> String;
}

impl Base64Encode for [u8] {
	fn to_base64(&self) -> String {
		use base64::Engine;
		base64::engine::general_purpose::STANDARD.encode(self)
	}
}

impl Base64Encode for Vec<u8> {
	fn to_base64(&self) -> String {
		self.as_slice().to_base64()
	}
}

/// Decodes standard base64.
pub fn base64_decode(value: &str) -> Result<Vec<u8>, base64::DecodeError> {
	use base64::Engine;
	base64::engine::general_purpose::STANDARD.decode(value)
}

pub fn serialize_h160<S>(hash: &H160, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&ScriptHashExtension::to_hex(hash))
}

pub fn deserialize_h160<'de, D>(deserializer: D) -> Result<H160, D::Error>
where
	D: Deserializer<'de>,
{
	let value = String::deserialize(deserializer)?;
	H160::from_hex(&value).map_err(D::Error::custom)
}

pub fn serialize_h256<S>(hash: &H256, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&Hash256Extension::to_hex(hash))
}

pub fn deserialize_h256<'de, D>(deserializer: D) -> Result<H256, D::Error>
where
	D: Deserializer<'de>,
{
	let value = String::deserialize(deserializer)?;
	H256::from_hex(&value).map_err(D::Error::custom)
}

pub fn serialize_base64<S>(bytes: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&bytes.to_base64())
}

pub fn deserialize_base64<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = String::deserialize(deserializer)?;
	base64_decode(&value).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn base64_round_trip() {
		let bytes = vec![0x01u8, 0x02, 0xFF];
		assert_eq!(base64_decode(&bytes.to_base64()).unwrap(), bytes);
	}
}
