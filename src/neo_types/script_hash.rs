//! `Hash160`/`Hash256` value types.
//!
//! Both hashes are stored big-endian, matching their hex string form.
//! The wire format of this library writes hashes big-endian as well; the
//! `to_le_vec` accessors exist for the few contexts that want the
//! reversed order (contract-call scripts push the little-endian form).

use primitive_types::{H160, H256};

use crate::neo_codec::{CodecError, Decoder, Encoder, NeoSerializable};
use crate::neo_config::NeoConstants;
use crate::neo_crypto::HashableForVec;
use crate::neo_types::TypeError;

/// A 160-bit script hash, big-endian.
pub type ScriptHash = H160;

/// A 256-bit hash (transaction or block id), big-endian.
pub type Hash256 = H256;

/// Operations every 20-byte script hash supports.
pub trait ScriptHashExtension: Sized {
	/// Parses from hex, with or without a `0x` prefix.
	fn from_hex(hex: &str) -> Result<Self, TypeError>;

	/// Builds from exactly 20 big-endian bytes.
	fn from_bytes(bytes: &[u8]) -> Result<Self, TypeError>;

	/// The script hash of a script: `RIPEMD160(SHA256(script))`.
	fn from_script(script: &[u8]) -> Self;

	/// The script hash of the single-sig verification script for a
	/// compressed public key.
	fn from_public_key(public_key: &[u8]) -> Result<Self, TypeError>;

	/// Decodes a Neo N3 address.
	fn from_address(address: &str) -> Result<Self, TypeError>;

	/// Encodes as a Neo N3 address.
	fn to_address(&self) -> String;

	/// Big-endian bytes.
	fn to_vec(&self) -> Vec<u8>;

	/// Little-endian (reversed) bytes.
	fn to_le_vec(&self) -> Vec<u8>;

	/// Lowercase hex of the big-endian form, no prefix.
	fn to_hex(&self) -> String;
}

impl ScriptHashExtension for H160 {
	fn from_hex(hex: &str) -> Result<Self, TypeError> {
		let hex = hex.trim_start_matches("0x");
		let bytes = hex::decode(hex)?;
		Self::from_bytes(&bytes)
	}

	fn from_bytes(bytes: &[u8]) -> Result<Self, TypeError> {
		if bytes.len() != NeoConstants::HASH160_SIZE {
			return Err(TypeError::InvalidArgument(format!(
				"Hash160 requires {} bytes, got {}",
				NeoConstants::HASH160_SIZE,
				bytes.len()
			)));
		}
		Ok(H160::from_slice(bytes))
	}

	fn from_script(script: &[u8]) -> Self {
		H160::from_slice(&script.sha256_ripemd160())
	}

	fn from_public_key(public_key: &[u8]) -> Result<Self, TypeError> {
		let script = crate::neo_builder::VerificationScript::from_encoded_public_key(public_key)
			.map_err(|e| TypeError::InvalidArgument(e.to_string()))?;
		Ok(script.hash())
	}

	fn from_address(address: &str) -> Result<Self, TypeError> {
		crate::neo_types::address_to_script_hash(address)
	}

	fn to_address(&self) -> String {
		crate::neo_types::script_hash_to_address(self)
	}

	fn to_vec(&self) -> Vec<u8> {
		self.as_bytes().to_vec()
	}

	fn to_le_vec(&self) -> Vec<u8> {
		let mut bytes = self.as_bytes().to_vec();
		bytes.reverse();
		bytes
	}

	fn to_hex(&self) -> String {
		hex::encode(self.as_bytes())
	}
}

/// Operations every 32-byte hash supports.
pub trait Hash256Extension: Sized {
	/// Parses from hex, with or without a `0x` prefix.
	fn from_hex(hex: &str) -> Result<Self, TypeError>;

	/// Builds from exactly 32 big-endian bytes.
	fn from_bytes(bytes: &[u8]) -> Result<Self, TypeError>;

	/// Little-endian (reversed) bytes.
	fn to_le_vec(&self) -> Vec<u8>;

	/// Lowercase hex of the big-endian form, no prefix.
	fn to_hex(&self) -> String;
}

impl Hash256Extension for H256 {
	fn from_hex(hex: &str) -> Result<Self, TypeError> {
		let hex = hex.trim_start_matches("0x");
		let bytes = hex::decode(hex)?;
		Self::from_bytes(&bytes)
	}

	fn from_bytes(bytes: &[u8]) -> Result<Self, TypeError> {
		if bytes.len() != NeoConstants::HASH256_SIZE {
			return Err(TypeError::InvalidArgument(format!(
				"Hash256 requires {} bytes, got {}",
				NeoConstants::HASH256_SIZE,
				bytes.len()
			)));
		}
		Ok(H256::from_slice(bytes))
	}

	fn to_le_vec(&self) -> Vec<u8> {
		let mut bytes = self.as_bytes().to_vec();
		bytes.reverse();
		bytes
	}

	fn to_hex(&self) -> String {
		hex::encode(self.as_bytes())
	}
}

impl NeoSerializable for H160 {
	type Error = CodecError;

	fn size(&self) -> usize {
		NeoConstants::HASH160_SIZE
	}

	fn encode(&self, writer: &mut Encoder) {
		writer.write_bytes(self.as_bytes());
	}

	fn decode(reader: &mut Decoder<'_>) -> Result<Self, Self::Error> {
		let bytes = reader.read_bytes(NeoConstants::HASH160_SIZE)?;
		Ok(H160::from_slice(&bytes))
	}
}

impl NeoSerializable for H256 {
	type Error = CodecError;

	fn size(&self) -> usize {
		NeoConstants::HASH256_SIZE
	}

	fn encode(&self, writer: &mut Encoder) {
		writer.write_bytes(self.as_bytes());
	}

	fn decode(reader: &mut Decoder<'_>) -> Result<Self, Self::Error> {
		let bytes = reader.read_bytes(NeoConstants::HASH256_SIZE)?;
		Ok(H256::from_slice(&bytes))
	}
}
