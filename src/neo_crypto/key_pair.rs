//! An elliptic-curve key pair and its Neo derivations.

use rand_core::OsRng;

use crate::neo_crypto::{
	private_key_from_wif, wif_from_private_key, CryptoError, Secp256r1PrivateKey,
	Secp256r1PublicKey, Secp256r1Signature,
};
use crate::neo_types::{Address, ScriptHash, ScriptHashExtension};

/// A secp256r1 private scalar together with its derived public point.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPair {
	pub private_key: Secp256r1PrivateKey,
	pub public_key: Secp256r1PublicKey,
}

impl KeyPair {
	pub fn new(private_key: Secp256r1PrivateKey, public_key: Secp256r1PublicKey) -> Self {
		Self { private_key, public_key }
	}

	/// Derives the public half from a private key.
	pub fn from_secret_key(private_key: &Secp256r1PrivateKey) -> Self {
		let public_key = private_key.to_public_key();
		Self::new(private_key.clone(), public_key)
	}

	/// Generates a fresh key pair from the OS CSRNG.
	pub fn new_random() -> Self {
		let mut rng = OsRng;
		Self::from_secret_key(&Secp256r1PrivateKey::random(&mut rng))
	}

	/// Builds from a raw 32-byte private key.
	pub fn from_private_key(private_key: &[u8; 32]) -> Result<Self, CryptoError> {
		Ok(Self::from_secret_key(&Secp256r1PrivateKey::from_bytes(private_key)?))
	}

	/// Imports from a WIF string.
	pub fn from_wif(wif: &str) -> Result<Self, CryptoError> {
		Ok(Self::from_secret_key(&private_key_from_wif(wif)?))
	}

	pub fn private_key(&self) -> &Secp256r1PrivateKey {
		&self.private_key
	}

	pub fn public_key(&self) -> &Secp256r1PublicKey {
		&self.public_key
	}

	pub fn private_key_bytes(&self) -> [u8; 32] {
		self.private_key.to_raw_bytes()
	}

	/// Exports the private key as WIF.
	pub fn export_as_wif(&self) -> String {
		wif_from_private_key(&self.private_key)
	}

	/// Signs `SHA256(message)`.
	pub fn sign(&self, message: &[u8]) -> Result<Secp256r1Signature, CryptoError> {
		self.private_key.sign_tx(message)
	}

	/// Signs a 32-byte digest directly.
	pub fn sign_hash(&self, digest: &[u8]) -> Result<Secp256r1Signature, CryptoError> {
		self.private_key.sign_prehash(digest)
	}

	/// The script hash of this key's single-sig verification script.
	pub fn get_script_hash(&self) -> ScriptHash {
		crate::neo_builder::VerificationScript::from_public_key(&self.public_key).hash()
	}

	pub fn get_address(&self) -> Address {
		self.get_script_hash().to_address()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wif_export_matches_known_vector() {
		let private_key =
			hex::decode("c7134d6fd8e73d819e82755c64c93788d8db0961929e025a53363c4cc02a6962")
				.unwrap();
		let key_pair =
			KeyPair::from_private_key(private_key.as_slice().try_into().unwrap()).unwrap();
		assert_eq!(
			key_pair.export_as_wif(),
			"L3tgppXLgdaeqSGSFw1Go3skBiy8vQAM7YMXvTHsKQtE16PBncSU"
		);
	}

	#[test]
	fn address_derivation_from_known_key() {
		// WIF L3yRvfEowWQx7VvH5n45T54rkmbwKjSP728m913EdKQVUNMebQNv.
		let key_pair = KeyPair::from_wif("L3yRvfEowWQx7VvH5n45T54rkmbwKjSP728m913EdKQVUNMebQNv")
			.unwrap();
		assert_eq!(
			hex::encode(key_pair.private_key_bytes()),
			"c983f3c6effa11a996b8def32f7ddca2a94c0c983b8a6025bb7a50f45e1cf647"
		);
		let address = key_pair.get_address();
		assert!(address.starts_with('N'));
		assert!(crate::neo_types::is_valid_address(&address));
	}

	#[test]
	fn random_pairs_differ() {
		let a = KeyPair::new_random();
		let b = KeyPair::new_random();
		assert_ne!(a.private_key_bytes(), b.private_key_bytes());
	}
}
