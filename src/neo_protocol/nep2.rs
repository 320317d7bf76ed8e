//! NEP-2 password-protected private keys.
//!
//! Encryption derives `(k1, k2)` with scrypt over a 4-byte address hash
//! salt, XORs the private key with `k1` and encrypts the two 16-byte
//! halves with AES-256-ECB under `k2`. The final string is the
//! base58check of `0x01 0x42 0xE0 ∥ salt ∥ ciphertext`. Decryption
//! recomputes the address hash to detect a wrong password.

use aes::cipher::block_padding::NoPadding;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit};
use scrypt::{scrypt, Params};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::neo_config::NeoConstants;
use crate::neo_crypto::{
	base58check_decode, base58check_encode, HashableForVec, KeyPair,
};
use crate::neo_types::public_key_to_address;

type Aes256EcbEnc = ecb::Encryptor<aes::Aes256>;
type Aes256EcbDec = ecb::Decryptor<aes::Aes256>;

/// Errors raised by NEP-2 encryption and decryption.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Nep2Error {
	/// The string is not a well-formed NEP-2 key.
	#[error("invalid NEP-2 format: {0}")]
	InvalidFormat(String),

	/// The password does not decrypt this key.
	#[error("wrong NEP-2 passphrase")]
	WrongPassphrase,

	/// The scrypt derivation failed or its cost parameters were rejected.
	#[error("scrypt: {0}")]
	ScryptFailed(String),
}

/// scrypt cost parameters as persisted in NEP-6 wallet files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptParamsDef {
	#[serde(default = "default_n")]
	pub n: u64,
	#[serde(default = "default_r")]
	pub r: u32,
	#[serde(default = "default_p")]
	pub p: u32,
}

fn default_n() -> u64 {
	1 << NeoConstants::SCRYPT_LOG_N
}

fn default_r() -> u32 {
	NeoConstants::SCRYPT_R
}

fn default_p() -> u32 {
	NeoConstants::SCRYPT_P
}

impl Default for ScryptParamsDef {
	fn default() -> Self {
		Self { n: default_n(), r: default_r(), p: default_p() }
	}
}

impl ScryptParamsDef {
	// File-specified parameters are honored for decryption but capped so a
	// hostile wallet file cannot demand unbounded work.
	fn to_params(self) -> Result<Params, Nep2Error> {
		if self.n > NeoConstants::SCRYPT_MAX_N {
			return Err(Nep2Error::ScryptFailed(format!(
				"cost parameter n={} exceeds the bound of {}",
				self.n,
				NeoConstants::SCRYPT_MAX_N
			)));
		}
		if self.n < 2 || !self.n.is_power_of_two() {
			return Err(Nep2Error::ScryptFailed(format!("n={} is not a power of two", self.n)));
		}
		let log_n = self.n.trailing_zeros() as u8;
		Params::new(log_n, self.r, self.p, 32).map_err(|e| Nep2Error::ScryptFailed(e.to_string()))
	}
}

/// The NEP-2 codec.
pub struct NEP2;

impl NEP2 {
	const PREFIX_1: u8 = 0x01;
	const PREFIX_2: u8 = 0x42;
	const FLAG_BYTE: u8 = 0xE0;
	const KEY_LENGTH: usize = 39;

	/// Encrypts a key pair under `password` with the standard parameters.
	pub fn encrypt(password: &str, key_pair: &KeyPair) -> Result<String, Nep2Error> {
		Self::encrypt_with_params(password, key_pair, ScryptParamsDef::default())
	}

	/// Encrypts a key pair under `password` with explicit scrypt
	/// parameters.
	pub fn encrypt_with_params(
		password: &str,
		key_pair: &KeyPair,
		params: ScryptParamsDef,
	) -> Result<String, Nep2Error> {
		let address_hash = address_hash_of(key_pair);
		let derived = derive_key(password, &address_hash, params)?;
		let (k1, k2) = derived.split_at(32);

		let private_key = key_pair.private_key_bytes();
		let mut xored = [0u8; 32];
		for i in 0..32 {
			xored[i] = private_key[i] ^ k1[i];
		}
		let ciphertext = encrypt_aes256_ecb(&xored, k2)?;

		let mut assembled = Vec::with_capacity(Self::KEY_LENGTH);
		assembled.push(Self::PREFIX_1);
		assembled.push(Self::PREFIX_2);
		assembled.push(Self::FLAG_BYTE);
		assembled.extend_from_slice(&address_hash);
		assembled.extend_from_slice(&ciphertext[..32]);
		Ok(base58check_encode(&assembled))
	}

	/// Decrypts a NEP-2 string with the standard parameters.
	pub fn decrypt(password: &str, nep2: &str) -> Result<KeyPair, Nep2Error> {
		Self::decrypt_with_params(password, nep2, ScryptParamsDef::default())
	}

	/// Decrypts a NEP-2 string with explicit scrypt parameters.
	pub fn decrypt_with_params(
		password: &str,
		nep2: &str,
		params: ScryptParamsDef,
	) -> Result<KeyPair, Nep2Error> {
		let data = base58check_decode(nep2)
			.map_err(|e| Nep2Error::InvalidFormat(e.to_string()))?;
		if data.len() != Self::KEY_LENGTH {
			return Err(Nep2Error::InvalidFormat(format!(
				"decodes to {} bytes, expected {}",
				data.len(),
				Self::KEY_LENGTH
			)));
		}
		if data[0] != Self::PREFIX_1 || data[1] != Self::PREFIX_2 || data[2] != Self::FLAG_BYTE {
			return Err(Nep2Error::InvalidFormat("wrong NEP-2 header bytes".to_string()));
		}
		let address_hash: [u8; 4] = data[3..7].try_into().expect("checked length");
		let ciphertext = &data[7..39];

		let derived = derive_key(password, &address_hash, params)?;
		let (k1, k2) = derived.split_at(32);

		let decrypted = decrypt_aes256_ecb(ciphertext, k2)?;
		let mut private_key = [0u8; 32];
		for i in 0..32 {
			private_key[i] = decrypted[i] ^ k1[i];
		}

		let key_pair = KeyPair::from_private_key(&private_key)
			.map_err(|_| Nep2Error::WrongPassphrase)?;
		if address_hash_of(&key_pair) != address_hash {
			return Err(Nep2Error::WrongPassphrase);
		}
		Ok(key_pair)
	}
}

// First 4 bytes of HASH256 over the key's Neo address string.
fn address_hash_of(key_pair: &KeyPair) -> [u8; 4] {
	let address = public_key_to_address(key_pair.public_key());
	let digest = address.as_bytes().hash256();
	let mut hash = [0u8; 4];
	hash.copy_from_slice(&digest[..4]);
	hash
}

fn derive_key(
	password: &str,
	salt: &[u8; 4],
	params: ScryptParamsDef,
) -> Result<[u8; 64], Nep2Error> {
	let params = params.to_params()?;
	let mut derived = [0u8; NeoConstants::SCRYPT_DK_LEN];
	scrypt(password.as_bytes(), salt, &params, &mut derived)
		.map_err(|e| Nep2Error::ScryptFailed(e.to_string()))?;
	Ok(derived)
}

fn encrypt_aes256_ecb(data: &[u8; 32], key: &[u8]) -> Result<[u8; 32], Nep2Error> {
	let key: [u8; 32] = key
		.try_into()
		.map_err(|_| Nep2Error::ScryptFailed("derived key too short".to_string()))?;
	let mut buffer = [0u8; 32];
	buffer.copy_from_slice(data);
	Aes256EcbEnc::new(&key.into())
		.encrypt_padded_mut::<NoPadding>(&mut buffer, 32)
		.map_err(|e| Nep2Error::InvalidFormat(e.to_string()))?;
	Ok(buffer)
}

fn decrypt_aes256_ecb(ciphertext: &[u8], key: &[u8]) -> Result<[u8; 32], Nep2Error> {
	let key: [u8; 32] = key
		.try_into()
		.map_err(|_| Nep2Error::ScryptFailed("derived key too short".to_string()))?;
	let mut buffer = [0u8; 32];
	buffer.copy_from_slice(ciphertext);
	Aes256EcbDec::new(&key.into())
		.decrypt_padded_mut::<NoPadding>(&mut buffer)
		.map_err(|e| Nep2Error::InvalidFormat(e.to_string()))?;
	Ok(buffer)
}
