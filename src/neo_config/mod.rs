//! Protocol constants and network parameters for Neo N3.

pub use constants::NeoConstants;
pub use network::NeoNetwork;

mod constants;
mod network;
