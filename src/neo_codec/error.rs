use thiserror::Error;

/// Errors raised by the binary codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
	/// The reader ran out of bytes before the value was complete.
	#[error("unexpected end of stream")]
	UnexpectedEof,

	/// The stream carried bytes that cannot be interpreted as the expected value.
	#[error("invalid data: {0}")]
	InvalidData(String),

	/// A type discriminant on the wire is not part of the expected set.
	#[error("invalid discriminant: {0}")]
	InvalidDiscriminant(String),

	/// A length prefix is out of the range the containing structure allows.
	#[error("invalid length: {0}")]
	InvalidLength(String),

	/// An embedded checksum did not match the recomputed value.
	#[error("checksum mismatch")]
	ChecksumMismatch,
}
