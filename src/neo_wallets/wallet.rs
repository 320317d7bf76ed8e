//! The wallet: an ordered account collection with address and script-hash
//! indices, persisted as NEP-6.

use std::collections::HashMap;
use std::path::Path;

use primitive_types::H160;
use tracing::warn;

use crate::neo_builder::VerificationScript;
use crate::neo_protocol::{Account, ScryptParamsDef};
use crate::neo_types::{base64_decode, Address, Base64Encode, ScriptHashExtension};
use crate::neo_wallets::nep6::{Nep6Account, Nep6Contract, Nep6Parameter, Nep6Wallet};
use crate::neo_wallets::WalletError;

/// An ordered collection of accounts with at most one default.
#[derive(Debug, Clone, Default)]
pub struct Wallet {
	name: String,
	version: String,
	scrypt_params: ScryptParamsDef,
	accounts: Vec<Account>,
	address_index: HashMap<Address, usize>,
	hash_index: HashMap<H160, usize>,
}

impl Wallet {
	pub const DEFAULT_WALLET_NAME: &'static str = "NeoWallet";
	pub const CURRENT_VERSION: &'static str = "1.0";

	/// An empty wallet.
	pub fn new() -> Self {
		Self {
			name: Self::DEFAULT_WALLET_NAME.to_string(),
			version: Self::CURRENT_VERSION.to_string(),
			scrypt_params: ScryptParamsDef::default(),
			accounts: Vec::new(),
			address_index: HashMap::new(),
			hash_index: HashMap::new(),
		}
	}

	/// A wallet with one freshly generated default account.
	pub fn create() -> Result<Self, WalletError> {
		let mut wallet = Self::new();
		let account = Account::create()?;
		let hash = account.get_script_hash();
		wallet.add_account(account)?;
		wallet.set_default_account(&hash)?;
		Ok(wallet)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn set_name(&mut self, name: impl Into<String>) {
		self.name = name.into();
	}

	pub fn version(&self) -> &str {
		&self.version
	}

	pub fn scrypt_params(&self) -> ScryptParamsDef {
		self.scrypt_params
	}

	pub fn set_scrypt_params(&mut self, params: ScryptParamsDef) {
		self.scrypt_params = params;
	}

	pub fn accounts(&self) -> &[Account] {
		&self.accounts
	}

	/// Adds an account; a second account for the same script hash is
	/// rejected.
	pub fn add_account(&mut self, account: Account) -> Result<&mut Self, WalletError> {
		let hash = account.get_script_hash();
		if self.hash_index.contains_key(&hash) {
			return Err(WalletError::InvalidAccount(format!(
				"account {} is already in the wallet",
				account.get_address()
			)));
		}
		self.accounts.push(account);
		self.rebuild_indices();
		Ok(self)
	}

	/// Removes an account by script hash, returning it when present.
	pub fn remove_account(&mut self, hash: &H160) -> Option<Account> {
		let position = self.hash_index.get(hash).copied()?;
		let account = self.accounts.remove(position);
		self.rebuild_indices();
		Some(account)
	}

	pub fn get_account(&self, hash: &H160) -> Option<&Account> {
		self.hash_index.get(hash).map(|i| &self.accounts[*i])
	}

	pub fn get_account_mut(&mut self, hash: &H160) -> Option<&mut Account> {
		let position = self.hash_index.get(hash).copied()?;
		Some(&mut self.accounts[position])
	}

	pub fn get_account_by_address(&self, address: &str) -> Option<&Account> {
		self.address_index.get(address).map(|i| &self.accounts[*i])
	}

	pub fn contains(&self, hash: &H160) -> bool {
		self.hash_index.contains_key(hash)
	}

	/// The default account, when one is marked.
	pub fn default_account(&self) -> Option<&Account> {
		self.accounts.iter().find(|a| a.is_default())
	}

	/// Marks `hash` as the default account, clearing any previous mark.
	pub fn set_default_account(&mut self, hash: &H160) -> Result<(), WalletError> {
		if !self.hash_index.contains_key(hash) {
			return Err(WalletError::InvalidAccount(format!(
				"no account with script hash {}",
				ScriptHashExtension::to_hex(hash)
			)));
		}
		for account in &mut self.accounts {
			account.set_default(account.get_script_hash() == *hash);
		}
		Ok(())
	}

	fn rebuild_indices(&mut self) {
		self.address_index = self
			.accounts
			.iter()
			.enumerate()
			.map(|(i, a)| (a.get_address(), i))
			.collect();
		self.hash_index = self
			.accounts
			.iter()
			.enumerate()
			.map(|(i, a)| (a.get_script_hash(), i))
			.collect();
	}

	/// Locks every account that still holds a plaintext key.
	pub fn encrypt_all_accounts(&mut self, password: &str) -> Result<(), WalletError> {
		let params = self.scrypt_params;
		for account in &mut self.accounts {
			if account.key_pair().is_some() {
				account.encrypt_private_key_with_params(password, params)?;
			}
		}
		Ok(())
	}

	/// The NEP-6 form. Accounts still holding plaintext keys are encrypted
	/// into the file under `password` without mutating the wallet.
	pub fn to_nep6(&self, password: &str) -> Result<Nep6Wallet, WalletError> {
		let mut accounts = Vec::with_capacity(self.accounts.len());
		for account in &self.accounts {
			accounts.push(account_to_nep6(account, password, self.scrypt_params)?);
		}
		Ok(Nep6Wallet {
			name: self.name.clone(),
			version: self.version.clone(),
			scrypt: self.scrypt_params,
			accounts,
			extra: None,
			tokens: None,
		})
	}

	/// Rebuilds a wallet from its NEP-6 form, decrypting each account with
	/// `password`. Accounts whose key does not decrypt are kept watch-only
	/// instead of failing the whole load.
	pub fn from_nep6(nep6: &Nep6Wallet, password: &str) -> Result<Self, WalletError> {
		let mut wallet = Self {
			name: nep6.name.clone(),
			version: nep6.version.clone(),
			scrypt_params: nep6.scrypt,
			accounts: Vec::new(),
			address_index: HashMap::new(),
			hash_index: HashMap::new(),
		};
		for entry in &nep6.accounts {
			let account = account_from_nep6(entry, password, nep6.scrypt)?;
			wallet.add_account(account)?;
		}
		if let Some(default) = nep6.accounts.iter().find(|a| a.is_default) {
			if let Ok(hash) = H160::from_address(&default.address) {
				let _ = wallet.set_default_account(&hash);
			}
		}
		Ok(wallet)
	}

	/// Writes the NEP-6 file.
	pub fn save_to_file(&self, path: impl AsRef<Path>, password: &str) -> Result<(), WalletError> {
		let nep6 = self.to_nep6(password)?;
		let json = serde_json::to_string_pretty(&nep6)?;
		std::fs::write(path, json)?;
		Ok(())
	}

	/// Reads a NEP-6 file and decrypts what it can.
	pub fn load(path: impl AsRef<Path>, password: &str) -> Result<Self, WalletError> {
		let json = std::fs::read_to_string(path)?;
		let nep6: Nep6Wallet = serde_json::from_str(&json)?;
		Self::from_nep6(&nep6, password)
	}
}

fn account_to_nep6(
	account: &Account,
	password: &str,
	params: ScryptParamsDef,
) -> Result<Nep6Account, WalletError> {
	let key = match (account.encrypted_private_key(), account.key_pair()) {
		(Some(encrypted), _) => Some(encrypted.clone()),
		(None, Some(key_pair)) => {
			Some(crate::neo_protocol::NEP2::encrypt_with_params(password, key_pair, params)?)
		},
		(None, None) => None,
	};

	let contract = account.verification_script().as_ref().map(|script| {
		let parameters = if script.is_multi_sig() {
			let threshold = script.get_signing_threshold().unwrap_or(0);
			(0..threshold)
				.map(|i| Nep6Parameter {
					param_name: format!("signature{i}"),
					param_type: "Signature".to_string(),
				})
				.collect()
		} else {
			vec![Nep6Parameter {
				param_name: "signature".to_string(),
				param_type: "Signature".to_string(),
			}]
		};
		Nep6Contract {
			script: Some(script.script().to_base64()),
			parameters,
			deployed: false,
		}
	});

	Ok(Nep6Account {
		address: account.get_address(),
		label: account.label().clone(),
		is_default: account.is_default(),
		lock: account.is_locked(),
		key,
		contract,
		extra: None,
	})
}

fn account_from_nep6(
	entry: &Nep6Account,
	password: &str,
	params: ScryptParamsDef,
) -> Result<Account, WalletError> {
	let verification_script = entry
		.contract
		.as_ref()
		.and_then(|c| c.script.as_ref())
		.and_then(|script| base64_decode(script).ok())
		.map(VerificationScript::from_bytes);

	let mut account = match entry.key.as_deref() {
		Some(encrypted) => {
			match crate::neo_protocol::NEP2::decrypt_with_params(password, encrypted, params) {
				Ok(key_pair) => {
					let mut account = Account::from_key_pair(key_pair);
					if let Some(script) = &verification_script {
						if script.hash() != account.get_script_hash() {
							// The ciphertext decrypted to a different key;
							// treat it as undecryptable.
							warn!(
								"account {}: decrypted key does not match its contract, keeping it watch-only",
								entry.address
							);
							account = watch_only_from_entry(entry, verification_script.clone())?;
						}
					}
					account
				},
				Err(e) => {
					warn!("account {}: NEP-2 decryption failed ({e}), keeping it watch-only", entry.address);
					let mut account = watch_only_from_entry(entry, verification_script.clone())?;
					account.set_encrypted_key(Some(encrypted.to_string()));
					account
				},
			}
		},
		None => watch_only_from_entry(entry, verification_script.clone())?,
	};

	account.set_label(entry.label.clone());
	Ok(account)
}

fn watch_only_from_entry(
	entry: &Nep6Account,
	verification_script: Option<VerificationScript>,
) -> Result<Account, WalletError> {
	match verification_script {
		Some(script) => Account::from_verification_script(script),
		None => Account::from_address(&entry.address),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::neo_protocol::NEP2;

	fn fast_params() -> ScryptParamsDef {
		ScryptParamsDef { n: 256, r: 1, p: 1 }
	}

	fn fast_wallet() -> Wallet {
		let mut wallet = Wallet::new();
		wallet.set_scrypt_params(fast_params());
		wallet
	}

	#[test]
	fn indices_follow_mutation() {
		let mut wallet = fast_wallet();
		let account1 = Account::create().unwrap();
		let account2 = Account::create().unwrap();
		let hash1 = account1.get_script_hash();
		let address2 = account2.get_address();

		wallet.add_account(account1).unwrap();
		wallet.add_account(account2).unwrap();
		assert!(wallet.contains(&hash1));
		assert!(wallet.get_account_by_address(&address2).is_some());

		wallet.remove_account(&hash1);
		assert!(!wallet.contains(&hash1));
		assert!(wallet.get_account_by_address(&address2).is_some());
	}

	#[test]
	fn duplicate_accounts_are_rejected() {
		let mut wallet = fast_wallet();
		let account = Account::create().unwrap();
		wallet.add_account(account.clone()).unwrap();
		assert!(wallet.add_account(account).is_err());
	}

	#[test]
	fn single_default_account() {
		let mut wallet = fast_wallet();
		let account1 = Account::create().unwrap();
		let account2 = Account::create().unwrap();
		let hash1 = account1.get_script_hash();
		let hash2 = account2.get_script_hash();
		wallet.add_account(account1).unwrap();
		wallet.add_account(account2).unwrap();

		wallet.set_default_account(&hash1).unwrap();
		assert_eq!(wallet.default_account().unwrap().get_script_hash(), hash1);

		wallet.set_default_account(&hash2).unwrap();
		assert_eq!(wallet.default_account().unwrap().get_script_hash(), hash2);
		assert_eq!(wallet.accounts().iter().filter(|a| a.is_default()).count(), 1);
	}

	#[test]
	fn nep6_round_trip_preserves_keys() {
		let mut wallet = fast_wallet();
		let account = Account::create().unwrap();
		let hash = account.get_script_hash();
		let key_bytes = account.key_pair().as_ref().unwrap().private_key_bytes();
		wallet.add_account(account).unwrap();
		wallet.set_default_account(&hash).unwrap();

		let nep6 = wallet.to_nep6("pw").unwrap();
		// The file never carries a plaintext key.
		assert!(nep6.accounts[0].key.as_ref().unwrap().starts_with("6P"));

		let restored = Wallet::from_nep6(&nep6, "pw").unwrap();
		let restored_account = restored.get_account(&hash).unwrap();
		assert_eq!(
			restored_account.key_pair().as_ref().unwrap().private_key_bytes(),
			key_bytes
		);
		assert_eq!(restored.default_account().unwrap().get_script_hash(), hash);
	}

	#[test]
	fn wrong_password_downgrades_to_watch_only() {
		let mut wallet = fast_wallet();
		let account = Account::create().unwrap();
		let hash = account.get_script_hash();
		wallet.add_account(account).unwrap();

		let nep6 = wallet.to_nep6("right").unwrap();
		let restored = Wallet::from_nep6(&nep6, "wrong").unwrap();
		let restored_account = restored.get_account(&hash).unwrap();
		assert!(restored_account.key_pair().is_none());
		// The ciphertext is retained so the user can retry with unlock.
		assert!(restored_account.encrypted_private_key().is_some());
	}

	#[test]
	fn file_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("wallet.json");

		let mut wallet = fast_wallet();
		wallet.set_name("test-wallet");
		let account = Account::create().unwrap();
		let hash = account.get_script_hash();
		wallet.add_account(account).unwrap();
		wallet.save_to_file(&path, "pw").unwrap();

		let loaded = Wallet::load(&path, "pw").unwrap();
		assert_eq!(loaded.name(), "test-wallet");
		assert!(loaded.get_account(&hash).unwrap().key_pair().is_some());
	}

	#[test]
	fn locked_account_ciphertext_is_reused() {
		let mut wallet = fast_wallet();
		let mut account = Account::create().unwrap();
		account.encrypt_private_key_with_params("pw", fast_params()).unwrap();
		let encrypted = account.encrypted_private_key().clone().unwrap();
		let hash = account.get_script_hash();
		wallet.add_account(account).unwrap();

		// to_nep6 must not re-encrypt an already locked account.
		let nep6 = wallet.to_nep6("other-password").unwrap();
		assert_eq!(nep6.accounts[0].key.as_deref(), Some(encrypted.as_str()));

		// And it still decrypts with the original password.
		let key_pair = NEP2::decrypt_with_params("pw", &encrypted, fast_params()).unwrap();
		assert_eq!(key_pair.get_script_hash(), hash);
	}
}
