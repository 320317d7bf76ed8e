//! Script emission and transaction assembly.

pub use script::{
	InteropService, InvocationScript, ScriptBuilder, VerificationScript,
};
pub use transaction::{
	sort_signers, Signer, Transaction, TransactionAttribute, TransactionBuilder,
	TransactionError, Witness, WitnessAction, WitnessCondition, WitnessRule, WitnessScope,
	GAS_TOKEN_HASH,
};

mod script;
mod transaction;
