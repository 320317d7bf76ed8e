//! The unified error type.
//!
//! Every subsystem surfaces its own error enum; `NeoError` aggregates
//! them so applications can bubble a single type through `?`.

use thiserror::Error;

use crate::neo_builder::TransactionError;
use crate::neo_clients::ProviderError;
use crate::neo_codec::CodecError;
use crate::neo_contract::ContractError;
use crate::neo_crypto::CryptoError;
use crate::neo_protocol::Nep2Error;
use crate::neo_types::TypeError;
use crate::neo_wallets::WalletError;

/// Any error this SDK can produce.
#[derive(Error, Debug)]
pub enum NeoError {
	#[error(transparent)]
	Type(#[from] TypeError),

	#[error(transparent)]
	Codec(#[from] CodecError),

	#[error(transparent)]
	Crypto(#[from] CryptoError),

	#[error(transparent)]
	Nep2(#[from] Nep2Error),

	#[error(transparent)]
	Transaction(#[from] TransactionError),

	#[error(transparent)]
	Wallet(#[from] WalletError),

	#[error(transparent)]
	Provider(#[from] ProviderError),

	#[error(transparent)]
	Contract(#[from] ContractError),

	#[error("illegal state: {0}")]
	IllegalState(String),
}

impl From<String> for NeoError {
	fn from(message: String) -> Self {
		NeoError::IllegalState(message)
	}
}

impl From<&str> for NeoError {
	fn from(message: &str) -> Self {
		NeoError::IllegalState(message.to_string())
	}
}
