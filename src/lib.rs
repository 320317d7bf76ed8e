//! # neo3-core
//!
//! The core client SDK for the Neo N3 blockchain: cryptographic identity,
//! the length-prefixed binary codec, Neo VM script emission, transaction
//! assembly with remote fee negotiation, and a blocking JSON-RPC client
//! with typed responses.
//!
//! ## Overview
//!
//! The crate is organized the way a transaction travels:
//!
//! - [`neo_crypto`] - secp256r1 key pairs, ECDSA signatures, hashes, WIF
//! - [`neo_codec`] - `Encoder`/`Decoder` and the `NeoSerializable` wire contract
//! - [`neo_types`] - hashes, addresses, contract parameters, stack items
//! - [`neo_builder`] - scripts, signers, witnesses and the transaction builder
//! - [`neo_clients`] - the blocking JSON-RPC client and block polling
//! - [`neo_contract`] - iterator traversal over invocation sessions
//! - [`neo_protocol`] - accounts, NEP-2 keys and typed node responses
//! - [`neo_wallets`] - wallets and the NEP-6 file format
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use neo3_core::prelude::*;
//!
//! fn main() -> Result<(), NeoError> {
//!     let provider = HttpProvider::new("https://testnet1.neo.org:443")?;
//!     let client = RpcClient::new(provider);
//!
//!     let sender = Account::from_wif("YOUR_SENDER_WIF")?;
//!     let recipient = ScriptHash::from_address("NbTiM6h8r99kpRtb428XcsUk1TzKed2gTc")?;
//!
//!     let mut builder = TransactionBuilder::with_client(&client);
//!     builder
//!         .call_contract(
//!             &GAS_TOKEN_HASH,
//!             "transfer",
//!             &[
//!                 ContractParameter::h160(&sender.get_script_hash()),
//!                 ContractParameter::h160(&recipient),
//!                 ContractParameter::integer(1_0000_0000),
//!                 ContractParameter::any(),
//!             ],
//!         )?
//!         .add_signer_account(&sender, vec![WitnessScope::CalledByEntry])?
//!         .sign_with(&sender)?;
//!
//!     let tx = builder.build_and_sign()?;
//!     let result = client.send_raw_transaction(&tx.serialize_checked()?.to_base64())?;
//!     println!("sent {}", result.hash);
//!     Ok(())
//! }
//! ```

pub mod neo_builder;
pub mod neo_clients;
pub mod neo_codec;
pub mod neo_config;
pub mod neo_contract;
pub mod neo_crypto;
pub mod neo_error;
pub mod neo_protocol;
pub mod neo_types;
pub mod neo_wallets;

// Short aliases, matching the module naming of the SDK family.
pub use neo_builder as builder;
pub use neo_clients as providers;
pub use neo_codec as codec;
pub use neo_config as config;
pub use neo_contract as contract;
pub use neo_crypto as crypto;
pub use neo_protocol as protocol;
pub use neo_types as types;
pub use neo_wallets as wallets;

/// Convenient imports for the common paths.
pub mod prelude {
	pub use super::neo_builder::{
		InteropService, InvocationScript, ScriptBuilder, Signer, Transaction,
		TransactionAttribute, TransactionBuilder, TransactionError, VerificationScript, Witness,
		WitnessAction, WitnessCondition, WitnessRule, WitnessScope, GAS_TOKEN_HASH,
	};
	pub use super::neo_clients::{
		BlockPolling, HttpProvider, JsonRpcTransport, ProviderError, RpcClient,
	};
	pub use super::neo_codec::{CodecError, Decoder, Encoder, NeoSerializable, VarSizeTrait};
	pub use super::neo_config::{NeoConstants, NeoNetwork};
	pub use super::neo_contract::{ContractError, NeoIterator};
	pub use super::neo_crypto::{
		CryptoError, HashableForVec, KeyPair, Secp256r1PrivateKey, Secp256r1PublicKey,
		Secp256r1Signature,
	};
	pub use super::neo_error::NeoError;
	pub use super::neo_protocol::{
		responses::InvocationResult, Account, Nep2Error, ScryptParamsDef, NEP2,
	};
	pub use super::neo_types::{
		is_valid_address, Address, Base64Encode, Bytes, ContractParameter, ContractParameterMap,
		ContractParameterType, Hash256, Hash256Extension, NefFile, OpCode, ScriptHash,
		ScriptHashExtension, StackItem, TypeError, VMState,
	};
	pub use super::neo_wallets::{Nep6Wallet, Wallet, WalletError};
}
