//! Protocol-level types: accounts, NEP-2 keys and the typed RPC
//! responses.

pub use account::Account;
pub use nep2::{Nep2Error, ScryptParamsDef, NEP2};

mod account;
mod nep2;
pub mod responses;
