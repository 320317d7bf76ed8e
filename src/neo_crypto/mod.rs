//! Cryptographic primitives: secp256r1 key pairs, ECDSA signatures,
//! the Neo hash compositions, WIF and base58check.

pub use base58_helper::{base58_decode, base58_encode, base58check_decode, base58check_encode};
pub use error::CryptoError;
pub use hash::HashableForVec;
pub use key_pair::KeyPair;
pub use keys::{
	recover_public_key, Secp256r1PrivateKey, Secp256r1PublicKey, Secp256r1Signature,
};
pub use utils::vec_to_array32;
pub use wif::{is_valid_wif, private_key_from_wif, wif_from_private_key};

mod base58_helper;
mod error;
mod hash;
mod key_pair;
mod keys;
mod utils;
mod wif;
