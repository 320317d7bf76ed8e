use thiserror::Error;

use crate::neo_clients::ProviderError;

/// Errors raised while consuming contract invocation results.
#[derive(Error, Debug)]
pub enum ContractError {
	/// The iterator was already fully traversed.
	#[error("iterator is exhausted")]
	IteratorExhausted,

	/// The server session backing the iterator is gone.
	#[error("iterator session was terminated")]
	SessionTerminated,

	#[error(transparent)]
	Provider(#[from] ProviderError),
}
