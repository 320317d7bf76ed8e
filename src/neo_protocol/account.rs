//! Accounts: single-sig, multi-sig and watch-only.
//!
//! An unlocked account holds its key pair in memory. Locking encrypts the
//! key to NEP-2 and wipes the plaintext; unlocking reverses it. Watch-only
//! accounts carry neither key nor ciphertext and cannot sign. A multi-sig
//! account owns no private key at all; its witnesses are assembled from
//! externally collected signatures.

use primitive_types::H160;

use crate::neo_builder::VerificationScript;
use crate::neo_crypto::{KeyPair, Secp256r1PublicKey, Secp256r1Signature};
use crate::neo_protocol::{ScryptParamsDef, NEP2};
use crate::neo_types::{Address, ScriptHash, ScriptHashExtension};
use crate::neo_wallets::WalletError;

/// One Neo account.
#[derive(Debug, Clone)]
pub struct Account {
	key_pair: Option<KeyPair>,
	script_hash: ScriptHash,
	label: Option<String>,
	verification_script: Option<VerificationScript>,
	is_default: bool,
	is_locked: bool,
	encrypted_private_key: Option<String>,
	signing_threshold: Option<u32>,
	nr_of_participants: Option<u32>,
}

impl Account {
	/// Generates a fresh account from the CSRNG.
	pub fn create() -> Result<Self, WalletError> {
		Ok(Self::from_key_pair(KeyPair::new_random()))
	}

	/// Builds an unlocked single-sig account around `key_pair`.
	pub fn from_key_pair(key_pair: KeyPair) -> Self {
		let verification_script = VerificationScript::from_public_key(key_pair.public_key());
		let script_hash = verification_script.hash();
		Self {
			key_pair: Some(key_pair),
			script_hash,
			label: Some(script_hash.to_address()),
			verification_script: Some(verification_script),
			is_default: false,
			is_locked: false,
			encrypted_private_key: None,
			signing_threshold: None,
			nr_of_participants: None,
		}
	}

	/// Imports a WIF-encoded private key.
	pub fn from_wif(wif: &str) -> Result<Self, WalletError> {
		Ok(Self::from_key_pair(KeyPair::from_wif(wif)?))
	}

	/// Imports a NEP-2 key, leaving the account unlocked.
	pub fn from_nep2(nep2: &str, password: &str) -> Result<Self, WalletError> {
		let key_pair = NEP2::decrypt(password, nep2)?;
		let mut account = Self::from_key_pair(key_pair);
		account.encrypted_private_key = Some(nep2.to_string());
		Ok(account)
	}

	/// A watch-only single-sig account for a public key.
	pub fn from_public_key(public_key: &Secp256r1PublicKey) -> Self {
		let verification_script = VerificationScript::from_public_key(public_key);
		let script_hash = verification_script.hash();
		Self {
			key_pair: None,
			script_hash,
			label: Some(script_hash.to_address()),
			verification_script: Some(verification_script),
			is_default: false,
			is_locked: false,
			encrypted_private_key: None,
			signing_threshold: None,
			nr_of_participants: None,
		}
	}

	/// A watch-only account known only by its address.
	pub fn from_address(address: &str) -> Result<Self, WalletError> {
		let script_hash = H160::from_address(address)?;
		Ok(Self::from_script_hash(script_hash))
	}

	/// A watch-only account known only by its script hash.
	pub fn from_script_hash(script_hash: H160) -> Self {
		Self {
			key_pair: None,
			script_hash,
			label: Some(script_hash.to_address()),
			verification_script: None,
			is_default: false,
			is_locked: false,
			encrypted_private_key: None,
			signing_threshold: None,
			nr_of_participants: None,
		}
	}

	/// An account backed by an existing verification script.
	pub fn from_verification_script(script: VerificationScript) -> Result<Self, WalletError> {
		let script_hash = script.hash();
		let (signing_threshold, nr_of_participants) = if script.is_multi_sig() {
			(Some(script.get_signing_threshold()?), Some(script.get_nr_of_accounts()?))
		} else {
			(None, None)
		};
		Ok(Self {
			key_pair: None,
			script_hash,
			label: Some(script_hash.to_address()),
			verification_script: Some(script),
			is_default: false,
			is_locked: false,
			encrypted_private_key: None,
			signing_threshold,
			nr_of_participants,
		})
	}

	/// A multi-sig account over `public_keys` with the given threshold.
	pub fn multi_sig_from_public_keys(
		public_keys: &[Secp256r1PublicKey],
		signing_threshold: u32,
	) -> Result<Self, WalletError> {
		let script = VerificationScript::from_multi_sig(public_keys, signing_threshold)?;
		Self::from_verification_script(script)
	}

	/// A watch-only multi-sig account known only by address and shape.
	pub fn multi_sig_from_address(
		address: &str,
		signing_threshold: u32,
		nr_of_participants: u32,
	) -> Result<Self, WalletError> {
		if signing_threshold < 1 || signing_threshold > nr_of_participants {
			return Err(WalletError::MultiSigThreshold);
		}
		let mut account = Self::from_address(address)?;
		account.signing_threshold = Some(signing_threshold);
		account.nr_of_participants = Some(nr_of_participants);
		Ok(account)
	}

	pub fn get_script_hash(&self) -> ScriptHash {
		self.script_hash
	}

	pub fn get_address(&self) -> Address {
		self.script_hash.to_address()
	}

	pub fn label(&self) -> &Option<String> {
		&self.label
	}

	pub fn set_label(&mut self, label: Option<String>) {
		self.label = label;
	}

	pub fn key_pair(&self) -> &Option<KeyPair> {
		&self.key_pair
	}

	pub fn verification_script(&self) -> &Option<VerificationScript> {
		&self.verification_script
	}

	pub fn encrypted_private_key(&self) -> &Option<String> {
		&self.encrypted_private_key
	}

	pub(crate) fn set_encrypted_key(&mut self, encrypted: Option<String>) {
		self.encrypted_private_key = encrypted;
	}

	pub fn is_default(&self) -> bool {
		self.is_default
	}

	pub(crate) fn set_default(&mut self, is_default: bool) {
		self.is_default = is_default;
	}

	pub fn is_locked(&self) -> bool {
		self.is_locked
	}

	pub fn is_multi_sig(&self) -> bool {
		self.signing_threshold.is_some() && self.nr_of_participants.is_some()
	}

	/// True when the account can neither sign nor be unlocked.
	pub fn is_watch_only(&self) -> bool {
		self.key_pair.is_none() && self.encrypted_private_key.is_none()
	}

	pub fn signing_threshold(&self) -> Result<u32, WalletError> {
		self.signing_threshold.ok_or(WalletError::MultiSigThreshold)
	}

	pub fn nr_of_participants(&self) -> Result<u32, WalletError> {
		self.nr_of_participants.ok_or(WalletError::MultiSigThreshold)
	}

	/// Encrypts the private key under `password` and wipes the plaintext,
	/// locking the account.
	pub fn encrypt_private_key(&mut self, password: &str) -> Result<(), WalletError> {
		self.encrypt_private_key_with_params(password, ScryptParamsDef::default())
	}

	pub fn encrypt_private_key_with_params(
		&mut self,
		password: &str,
		params: ScryptParamsDef,
	) -> Result<(), WalletError> {
		let key_pair = self.key_pair.as_ref().ok_or(WalletError::NoPrivateKey)?;
		let encrypted = NEP2::encrypt_with_params(password, key_pair, params)?;
		self.encrypted_private_key = Some(encrypted);
		self.key_pair = None;
		self.is_locked = true;
		Ok(())
	}

	/// Decrypts the stored NEP-2 ciphertext, unlocking the account. A
	/// wrong password fails with `Nep2DecryptionFailed` and the account
	/// stays locked.
	pub fn decrypt_private_key(&mut self, password: &str) -> Result<(), WalletError> {
		self.decrypt_private_key_with_params(password, ScryptParamsDef::default())
	}

	pub fn decrypt_private_key_with_params(
		&mut self,
		password: &str,
		params: ScryptParamsDef,
	) -> Result<(), WalletError> {
		if self.key_pair.is_some() {
			self.is_locked = false;
			return Ok(());
		}
		let encrypted = self.encrypted_private_key.as_ref().ok_or(WalletError::NoPrivateKey)?;
		let key_pair = NEP2::decrypt_with_params(password, encrypted, params)?;
		self.key_pair = Some(key_pair);
		self.is_locked = false;
		Ok(())
	}

	/// Signs a 32-byte digest with this account's key.
	pub fn sign_hash(&self, digest: &[u8]) -> Result<Secp256r1Signature, WalletError> {
		if self.is_locked {
			return Err(WalletError::AccountLocked);
		}
		let key_pair = self.key_pair.as_ref().ok_or(WalletError::NoPrivateKey)?;
		Ok(key_pair.sign_hash(digest)?)
	}

	/// Exports the plaintext WIF. Only available while unlocked; this is
	/// the single place plaintext key material leaves the account.
	pub fn export_wif(&self) -> Result<String, WalletError> {
		if self.is_locked {
			return Err(WalletError::AccountLocked);
		}
		let key_pair = self.key_pair.as_ref().ok_or(WalletError::NoPrivateKey)?;
		Ok(key_pair.export_as_wif())
	}
}

impl PartialEq for Account {
	fn eq(&self, other: &Self) -> bool {
		self.script_hash == other.script_hash
			&& self.label == other.label
			&& self.is_locked == other.is_locked
			&& self.encrypted_private_key == other.encrypted_private_key
			&& self.signing_threshold == other.signing_threshold
			&& self.nr_of_participants == other.nr_of_participants
	}
}

impl From<KeyPair> for Account {
	fn from(key_pair: KeyPair) -> Self {
		Self::from_key_pair(key_pair)
	}
}

impl TryFrom<&str> for Account {
	type Error = WalletError;

	fn try_from(address: &str) -> Result<Self, Self::Error> {
		Self::from_address(address)
	}
}
