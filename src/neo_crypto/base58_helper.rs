//! base58 and base58check codecs.

use crate::neo_crypto::{CryptoError, HashableForVec};

/// Plain base58 encoding.
pub fn base58_encode(bytes: &[u8]) -> String {
	bs58::encode(bytes).into_string()
}

/// Plain base58 decoding.
pub fn base58_decode(encoded: &str) -> Result<Vec<u8>, CryptoError> {
	bs58::decode(encoded)
		.into_vec()
		.map_err(|e| CryptoError::InvalidKey(format!("base58: {e}")))
}

/// Appends the 4-byte `HASH256` checksum and base58-encodes.
pub fn base58check_encode(bytes: &[u8]) -> String {
	let checksum = &bytes.hash256()[..4];
	let mut data = bytes.to_vec();
	data.extend_from_slice(checksum);
	base58_encode(&data)
}

/// Decodes base58check, validating and stripping the checksum.
pub fn base58check_decode(encoded: &str) -> Result<Vec<u8>, CryptoError> {
	let data = base58_decode(encoded)?;
	if data.len() < 4 {
		return Err(CryptoError::InvalidKey("base58check payload too short".to_string()));
	}
	let (payload, checksum) = data.split_at(data.len() - 4);
	if &payload.hash256()[..4] != checksum {
		return Err(CryptoError::ChecksumMismatch);
	}
	Ok(payload.to_vec())
}
