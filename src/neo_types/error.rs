use thiserror::Error;

/// Errors for ill-formed arguments: bad hex, wrong byte lengths,
/// malformed addresses and out-of-range values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	#[error("invalid address: {0}")]
	InvalidAddress(String),

	#[error("invalid encoding: {0}")]
	InvalidEncoding(String),
}

impl From<hex::FromHexError> for TypeError {
	fn from(err: hex::FromHexError) -> Self {
		TypeError::InvalidEncoding(err.to_string())
	}
}
