//! Contract-side helpers: the session-backed iterator wrapper.

pub use error::ContractError;
pub use iterator::NeoIterator;

mod error;
mod iterator;
