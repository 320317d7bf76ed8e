use thiserror::Error;

use crate::neo_crypto::CryptoError;
use crate::neo_protocol::Nep2Error;
use crate::neo_types::TypeError;

/// Errors raised by accounts and wallets.
#[derive(Error, Debug)]
pub enum WalletError {
	/// The account is locked; unlock it before signing or exporting.
	#[error("account is locked")]
	AccountLocked,

	/// The account holds no private key (watch-only or multi-sig).
	#[error("account holds no private key")]
	NoPrivateKey,

	/// A multi-sig operation was attempted without a matching quorum, or
	/// the account is not multi-sig at all.
	#[error("multi-sig threshold not satisfiable")]
	MultiSigThreshold,

	/// Reading or writing the wallet file failed.
	#[error("wallet io error: {0}")]
	WalletIoError(String),

	/// The NEP-2 ciphertext did not decrypt under the given password.
	#[error("NEP-2 decryption failed")]
	Nep2DecryptionFailed,

	/// An account definition is malformed.
	#[error("invalid account: {0}")]
	InvalidAccount(String),

	#[error(transparent)]
	Crypto(#[from] CryptoError),
}

impl From<Nep2Error> for WalletError {
	fn from(err: Nep2Error) -> Self {
		match err {
			Nep2Error::WrongPassphrase => WalletError::Nep2DecryptionFailed,
			other => WalletError::InvalidAccount(other.to_string()),
		}
	}
}

impl From<TypeError> for WalletError {
	fn from(err: TypeError) -> Self {
		WalletError::InvalidAccount(err.to_string())
	}
}

impl From<std::io::Error> for WalletError {
	fn from(err: std::io::Error) -> Self {
		WalletError::WalletIoError(err.to_string())
	}
}

impl From<serde_json::Error> for WalletError {
	fn from(err: serde_json::Error) -> Self {
		WalletError::WalletIoError(err.to_string())
	}
}
