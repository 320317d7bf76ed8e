//! Typed decoders for the JSON-RPC response surface.

pub use application_log::{ApplicationLog, Execution, Notification};
pub use contract_state::{ContractManifest, ContractNef, ContractState};
pub use invocation_result::InvocationResult;
pub use misc::{
	AddressEntry, Peers, RawTransaction, UnclaimedGas, ValidateAddress, Validator, WalletBalance,
};
pub use neo_block::NeoBlock;
pub use neo_transaction_result::RTransaction;
pub use neo_version::{NeoProtocol, NeoVersion};
pub use neo_witness::NeoWitness;
pub use nep17::{Nep17Balance, Nep17Balances, Nep17Transfer, Nep17Transfers};
pub use state::{FoundStorage, StateHeight, StateRoot, StorageEntry};

mod application_log;
mod contract_state;
mod invocation_result;
mod misc;
mod neo_block;
mod neo_transaction_result;
mod neo_version;
mod neo_witness;
mod nep17;
mod state;
