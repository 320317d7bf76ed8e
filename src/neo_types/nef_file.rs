//! NEF (Neo Executable Format), the on-chain bytecode container.
//!
//! Layout: `"NEF3"` magic, var-string compiler, var-string version,
//! var-string source, var-bytes script, then a 4-byte checksum equal to
//! the first four bytes of `HASH256` over everything preceding it.
//! Base64 is the canonical transport form.

use serde::{Deserialize, Serialize};

use crate::neo_codec::{CodecError, Decoder, Encoder, NeoSerializable, VarSizeTrait};
use crate::neo_crypto::HashableForVec;
use crate::neo_types::serde_helpers::{base64_decode, Base64Encode};

const NEF_MAGIC: &[u8; 4] = b"NEF3";

/// A parsed NEF file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NefFile {
	pub compiler: String,
	pub version: String,
	pub source: String,
	#[serde(with = "script_base64")]
	pub script: Vec<u8>,
	pub checksum: [u8; 4],
}

impl NefFile {
	/// Builds a NEF around `script` and computes its checksum.
	pub fn new(
		script: Vec<u8>,
		compiler: impl Into<String>,
		version: impl Into<String>,
		source: impl Into<String>,
	) -> Self {
		let mut file = Self {
			compiler: compiler.into(),
			version: version.into(),
			source: source.into(),
			script,
			checksum: [0u8; 4],
		};
		file.checksum = file.compute_checksum();
		file
	}

	fn header_bytes(&self) -> Vec<u8> {
		let mut writer = Encoder::new();
		writer.write_bytes(NEF_MAGIC);
		writer.write_var_string(&self.compiler);
		writer.write_var_string(&self.version);
		writer.write_var_string(&self.source);
		writer.write_var_bytes(&self.script);
		writer.into_bytes()
	}

	fn compute_checksum(&self) -> [u8; 4] {
		let digest = self.header_bytes().hash256();
		let mut checksum = [0u8; 4];
		checksum.copy_from_slice(&digest[..4]);
		checksum
	}

	/// True when the stored checksum matches the content.
	pub fn verify_checksum(&self) -> bool {
		self.checksum == self.compute_checksum()
	}

	/// Encodes to the base64 transport form.
	pub fn to_base64(&self) -> String {
		self.to_array().to_base64()
	}

	/// Decodes from base64, verifying magic and checksum.
	pub fn from_base64(encoded: &str) -> Result<Self, CodecError> {
		let bytes = base64_decode(encoded).map_err(|e| CodecError::InvalidData(e.to_string()))?;
		let mut reader = Decoder::new(&bytes);
		Self::decode(&mut reader)
	}
}

impl NeoSerializable for NefFile {
	type Error = CodecError;

	fn size(&self) -> usize {
		NEF_MAGIC.len()
			+ self.compiler.as_bytes().var_size()
			+ self.version.as_bytes().var_size()
			+ self.source.as_bytes().var_size()
			+ self.script.as_slice().var_size()
			+ 4
	}

	fn encode(&self, writer: &mut Encoder) {
		writer.write_bytes(&self.header_bytes());
		writer.write_bytes(&self.checksum);
	}

	fn decode(reader: &mut Decoder<'_>) -> Result<Self, Self::Error> {
		let magic = reader.read_bytes(4)?;
		if magic != NEF_MAGIC {
			return Err(CodecError::InvalidData(format!("bad NEF magic {:02x?}", magic)));
		}
		let compiler = reader.read_var_string()?;
		let version = reader.read_var_string()?;
		let source = reader.read_var_string()?;
		let script = reader.read_var_bytes()?;
		let mut checksum = [0u8; 4];
		checksum.copy_from_slice(&reader.read_bytes(4)?);

		let file = Self { compiler, version, source, script, checksum };
		if !file.verify_checksum() {
			return Err(CodecError::ChecksumMismatch);
		}
		Ok(file)
	}
}

mod script_base64 {
	use serde::de::Error;
	use serde::{Deserialize, Deserializer, Serializer};

	use crate::neo_types::serde_helpers::{base64_decode, Base64Encode};

	pub fn serialize<S: Serializer>(script: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&script.to_base64())
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
		let value = String::deserialize(deserializer)?;
		base64_decode(&value).map_err(D::Error::custom)
	}
}
