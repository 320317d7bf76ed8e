use thiserror::Error;

/// Errors raised by key handling, signing and the key encodings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
	/// A private or public key is malformed or out of range.
	#[error("invalid key: {0}")]
	InvalidKey(String),

	/// Bytes claimed to be an EC point do not lie on secp256r1.
	#[error("point is not on the curve")]
	PointNotOnCurve,

	/// The signing operation failed.
	#[error("signing failed")]
	SignFailed,

	/// The signature does not verify against the key and message.
	#[error("signature verification failed")]
	VerifyFailed,

	/// The scrypt key derivation failed or its parameters were rejected.
	#[error("scrypt failed: {0}")]
	ScryptFailed(String),

	/// A base58check or WIF checksum did not match.
	#[error("checksum mismatch")]
	ChecksumMismatch,
}

impl From<hex::FromHexError> for CryptoError {
	fn from(err: hex::FromHexError) -> Self {
		CryptoError::InvalidKey(err.to_string())
	}
}
