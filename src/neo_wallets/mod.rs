//! Wallets and their NEP-6 persisted form.

pub use nep6::{Nep6Account, Nep6Contract, Nep6Parameter, Nep6Wallet};
pub use wallet::Wallet;
pub use wallet_error::WalletError;

mod nep6;
mod wallet;
mod wallet_error;
