use crate::neo_crypto::CryptoError;

/// Converts a byte vector into a 32-byte array.
pub fn vec_to_array32(vec: Vec<u8>) -> Result<[u8; 32], CryptoError> {
	vec.try_into()
		.map_err(|v: Vec<u8>| CryptoError::InvalidKey(format!("expected 32 bytes, got {}", v.len())))
}
