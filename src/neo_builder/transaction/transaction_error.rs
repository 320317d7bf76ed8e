use thiserror::Error;

use crate::neo_clients::ProviderError;
use crate::neo_codec::CodecError;
use crate::neo_config::NeoConstants;
use crate::neo_crypto::CryptoError;
use crate::neo_types::TypeError;
use crate::neo_wallets::WalletError;

/// Errors raised while assembling, validating or signing a transaction.
#[derive(Error, Debug)]
pub enum TransactionError {
	/// The transaction has no signers.
	#[error("a transaction requires at least one signer")]
	NoSigners,

	/// The transaction script is missing or empty.
	#[error("the transaction script is not set")]
	NoScript,

	/// Two signers name the same account.
	#[error("duplicate signer for the same account")]
	DuplicateSigner,

	/// More than the allowed number of attributes.
	#[error("a transaction cannot carry more than {} attributes", NeoConstants::MAX_TRANSACTION_ATTRIBUTES)]
	AttributeLimit,

	/// Witness and signer counts differ on a transaction meant for
	/// submission.
	#[error("witness count {witnesses} does not match signer count {signers}")]
	WitnessSignerMismatch { witnesses: usize, signers: usize },

	/// The serialized transaction exceeds the protocol cap.
	#[error("transaction of {size} bytes exceeds the maximum of {} bytes", NeoConstants::MAX_TRANSACTION_SIZE)]
	TransactionTooLarge { size: usize },

	/// The node reported a FAULT state for the invocation.
	#[error("the invocation faulted: {0}")]
	ScriptFault(String),

	/// A high-priority transaction without a committee signer.
	#[error("only committee members may send high-priority transactions")]
	HighPriorityNotAllowed,

	/// The sender's GAS balance does not cover the fees.
	#[error("insufficient funds: required {required}, available {available}")]
	InsufficientFunds { required: i64, available: i64 },

	/// A builder was driven into a contradictory configuration.
	#[error("illegal state: {0}")]
	IllegalState(String),

	#[error(transparent)]
	Type(#[from] TypeError),

	#[error(transparent)]
	Codec(#[from] CodecError),

	#[error(transparent)]
	Crypto(#[from] CryptoError),

	#[error(transparent)]
	Wallet(#[from] WalletError),

	#[error(transparent)]
	Provider(#[from] ProviderError),
}
