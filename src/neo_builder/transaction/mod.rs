pub use signer::Signer;
pub use transaction::Transaction;
pub use transaction_attribute::TransactionAttribute;
pub use transaction_builder::{sort_signers, TransactionBuilder, GAS_TOKEN_HASH};
pub use transaction_error::TransactionError;
pub use witness::Witness;
pub use witness_rule::{WitnessAction, WitnessCondition, WitnessRule};
pub use witness_scope::WitnessScope;

mod signer;
mod transaction;
mod transaction_attribute;
mod transaction_builder;
mod transaction_error;
mod witness;
mod witness_rule;
mod witness_scope;
