//! High-level transaction assembly and fee negotiation.
//!
//! The builder is chainable and fails on the first error. Fees are
//! negotiated with the connected node at build time: the system fee from
//! `invokescript`, the network fee from `calculatenetworkfee` over a
//! provisional transaction carrying placeholder witnesses.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;

use lazy_static::lazy_static;
use primitive_types::{H160, H256};
use rand::RngCore;

use crate::neo_builder::{
	Signer, Transaction, TransactionAttribute, TransactionError, VerificationScript, Witness,
	WitnessScope,
};
use crate::neo_clients::{JsonRpcTransport, RpcClient};
use crate::neo_codec::NeoSerializable;
use crate::neo_config::NeoConstants;
use crate::neo_crypto::{Secp256r1PublicKey, Secp256r1Signature};
use crate::neo_protocol::Account;
use crate::neo_types::{
	Base64Encode, Bytes, ContractParameter, ScriptHash, ScriptHashExtension, TypeError,
};
use crate::neo_wallets::WalletError;

lazy_static! {
	/// Script hash of the native GAS token.
	pub static ref GAS_TOKEN_HASH: ScriptHash =
		ScriptHash::from_hex("d2a4cff31913016155e38e474a2c06d08be276cf").unwrap();
}

const BALANCE_OF_FUNCTION: &str = "balanceOf";

/// Builder for [`Transaction`]s.
pub struct TransactionBuilder<'a, P: JsonRpcTransport> {
	client: Option<&'a RpcClient<P>>,
	version: u8,
	nonce: u32,
	valid_until_block: Option<u32>,
	signers: Vec<Signer>,
	signing_accounts: Vec<Account>,
	collected_signatures: HashMap<H160, Vec<(Secp256r1PublicKey, Secp256r1Signature)>>,
	attributes: Vec<TransactionAttribute>,
	script: Option<Bytes>,
	additional_system_fee: u64,
	additional_network_fee: u64,
	allow_transmission_on_fault: bool,
	fee_consumer: Option<Box<dyn FnMut(i64, i64) + 'a>>,
	fee_error: Option<TransactionError>,
}

impl<P: JsonRpcTransport> Debug for TransactionBuilder<'_, P> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TransactionBuilder")
			.field("version", &self.version)
			.field("nonce", &self.nonce)
			.field("valid_until_block", &self.valid_until_block)
			.field("signers", &self.signers)
			.field("attributes", &self.attributes)
			.field("script", &self.script.as_ref().map(hex::encode))
			.field("additional_system_fee", &self.additional_system_fee)
			.field("additional_network_fee", &self.additional_network_fee)
			.finish()
	}
}

impl<'a, P: JsonRpcTransport> TransactionBuilder<'a, P> {
	pub fn new() -> Self {
		Self {
			client: None,
			version: NeoConstants::CURRENT_TX_VERSION,
			nonce: random_nonce(),
			valid_until_block: None,
			signers: Vec::new(),
			signing_accounts: Vec::new(),
			collected_signatures: HashMap::new(),
			attributes: Vec::new(),
			script: None,
			additional_system_fee: 0,
			additional_network_fee: 0,
			allow_transmission_on_fault: false,
			fee_consumer: None,
			fee_error: None,
		}
	}

	pub fn with_client(client: &'a RpcClient<P>) -> Self {
		Self { client: Some(client), ..Self::new() }
	}

	pub fn version(&mut self, version: u8) -> &mut Self {
		self.version = version;
		self
	}

	/// Sets an explicit nonce.
	pub fn nonce(&mut self, nonce: u32) -> &mut Self {
		self.nonce = nonce;
		self
	}

	/// Draws a fresh nonce from the CSRNG; zero is replaced by one.
	pub fn random_nonce(&mut self) -> &mut Self {
		self.nonce = random_nonce();
		self
	}

	pub fn valid_until_block(&mut self, block: u32) -> Result<&mut Self, TransactionError> {
		if block == 0 {
			return Err(TransactionError::IllegalState(
				"valid_until_block must be positive".to_string(),
			));
		}
		self.valid_until_block = Some(block);
		Ok(self)
	}

	/// Sets the validity window relative to the node's current height,
	/// queried once.
	pub fn valid_until_block_relative(&mut self, blocks: u32) -> Result<&mut Self, TransactionError> {
		let height = self.client()?.get_block_count()?;
		self.valid_until_block = Some(height + blocks);
		Ok(self)
	}

	pub fn script(&mut self, script: Bytes) -> &mut Self {
		self.script = Some(script);
		self
	}

	pub fn extend_script(&mut self, script: Bytes) -> &mut Self {
		match &mut self.script {
			Some(existing) => existing.extend(script),
			None => self.script = Some(script),
		}
		self
	}

	/// Replaces the script with a contract call.
	pub fn call_contract(
		&mut self,
		contract: &H160,
		method: &str,
		params: &[ContractParameter],
	) -> Result<&mut Self, TransactionError> {
		let mut builder = crate::neo_builder::ScriptBuilder::new();
		builder.contract_call(contract, method, params)?;
		self.script = Some(builder.to_bytes());
		Ok(self)
	}

	pub fn add_signer(&mut self, signer: Signer) -> Result<&mut Self, TransactionError> {
		if self.signers.iter().any(|s| s.account == signer.account) {
			return Err(TransactionError::DuplicateSigner);
		}
		self.signers.push(signer);
		Ok(self)
	}

	pub fn signers(&mut self, signers: Vec<Signer>) -> Result<&mut Self, TransactionError> {
		let accounts: HashSet<&H160> = signers.iter().map(|s| &s.account).collect();
		if accounts.len() != signers.len() {
			return Err(TransactionError::DuplicateSigner);
		}
		self.signers = signers;
		Ok(self)
	}

	/// Adds a signer for `account` and registers the account for signing.
	pub fn add_signer_account(
		&mut self,
		account: &Account,
		scopes: Vec<WitnessScope>,
	) -> Result<&mut Self, TransactionError> {
		let signer = Signer::new(account.get_script_hash(), scopes)?;
		self.add_signer(signer)?;
		self.remember_account(account);
		Ok(self)
	}

	pub fn add_attribute(
		&mut self,
		attribute: TransactionAttribute,
	) -> Result<&mut Self, TransactionError> {
		if matches!(attribute, TransactionAttribute::HighPriority) && self.is_high_priority() {
			return Ok(self);
		}
		if self.attributes.len() >= NeoConstants::MAX_TRANSACTION_ATTRIBUTES {
			return Err(TransactionError::AttributeLimit);
		}
		self.attributes.push(attribute);
		Ok(self)
	}

	/// Adds or removes the `HighPriority` attribute. The committee check
	/// runs at build time.
	pub fn high_priority(&mut self, high_priority: bool) -> Result<&mut Self, TransactionError> {
		if high_priority {
			self.add_attribute(TransactionAttribute::HighPriority)?;
		} else {
			self.attributes
				.retain(|a| !matches!(a, TransactionAttribute::HighPriority));
		}
		Ok(self)
	}

	pub fn is_high_priority(&self) -> bool {
		self.attributes
			.iter()
			.any(|a| matches!(a, TransactionAttribute::HighPriority))
	}

	pub fn additional_system_fee(&mut self, fee: u64) -> &mut Self {
		self.additional_system_fee = fee;
		self
	}

	pub fn additional_network_fee(&mut self, fee: u64) -> &mut Self {
		self.additional_network_fee = fee;
		self
	}

	/// Permits building even when the node reports a FAULT for the script.
	pub fn allow_transmission_on_fault(&mut self) -> &mut Self {
		self.allow_transmission_on_fault = true;
		self
	}

	/// Runs `consumer(required, balance)` at build time when the first
	/// signer's GAS balance does not cover the fees. Mutually exclusive
	/// with [`TransactionBuilder::fail_on_insufficient_funds`].
	pub fn on_insufficient_funds<F>(&mut self, consumer: F) -> Result<&mut Self, TransactionError>
	where
		F: FnMut(i64, i64) + 'a,
	{
		if self.fee_error.is_some() {
			return Err(TransactionError::IllegalState(
				"an insufficient-funds error is already configured".to_string(),
			));
		}
		self.fee_consumer = Some(Box::new(consumer));
		Ok(self)
	}

	/// Raises `error` at build time when the first signer's GAS balance
	/// does not cover the fees. Mutually exclusive with
	/// [`TransactionBuilder::on_insufficient_funds`].
	pub fn fail_on_insufficient_funds(
		&mut self,
		error: TransactionError,
	) -> Result<&mut Self, TransactionError> {
		if self.fee_consumer.is_some() {
			return Err(TransactionError::IllegalState(
				"an insufficient-funds consumer is already configured".to_string(),
			));
		}
		self.fee_error = Some(error);
		Ok(self)
	}

	/// Attaches an externally collected signature for `account`, keyed by
	/// the participant public key that produced it. The signature must be
	/// over the transaction id of the final unsigned form (see
	/// [`TransactionBuilder::build_unsigned`]). Once a multi-sig account
	/// has signatures for its full quorum it can be passed to
	/// [`TransactionBuilder::sign_with`] like any other account.
	pub fn add_signature(
		&mut self,
		account: &Account,
		public_key: &Secp256r1PublicKey,
		signature: Secp256r1Signature,
	) -> Result<&mut Self, TransactionError> {
		let hash = account.get_script_hash();
		if !self.signers.iter().any(|s| s.account == hash) {
			return Err(TransactionError::IllegalState(format!(
				"no signer for account {}",
				account.get_address()
			)));
		}
		let script = account.verification_script().as_ref().ok_or_else(|| {
			TypeError::InvalidArgument(format!(
				"account {} has no verification script to attach signatures to",
				account.get_address()
			))
		})?;
		if !script.get_public_keys()?.contains(public_key) {
			return Err(TypeError::InvalidArgument(format!(
				"public key {} does not participate in account {}",
				public_key.get_encoded_compressed_hex(),
				account.get_address()
			))
			.into());
		}

		let collected = self.collected_signatures.entry(hash).or_default();
		match collected.iter_mut().find(|(key, _)| key == public_key) {
			Some((_, existing)) => *existing = signature,
			None => collected.push((public_key.clone(), signature)),
		}
		self.remember_account(account);
		Ok(self)
	}

	// Distinct collected signatures for the account, measured against the
	// threshold its verification script demands.
	fn has_collected_quorum(&self, account: &Account) -> bool {
		let Some(script) = account.verification_script().as_ref() else { return false };
		let Ok(threshold) = script.get_signing_threshold() else { return false };
		self.collected_signatures
			.get(&account.get_script_hash())
			.map_or(0, Vec::len) >= threshold as usize
	}

	/// Registers `account` to sign the transaction at
	/// [`TransactionBuilder::build_and_sign`]. Locked accounts are
	/// rejected; a multi-sig account is accepted only once
	/// [`TransactionBuilder::add_signature`] has collected its quorum.
	pub fn sign_with(&mut self, account: &Account) -> Result<&mut Self, TransactionError> {
		if !self.signers.iter().any(|s| s.account == account.get_script_hash()) {
			return Err(TransactionError::IllegalState(format!(
				"no signer for account {}",
				account.get_address()
			)));
		}
		if account.is_locked() {
			return Err(WalletError::AccountLocked.into());
		}
		if self.has_collected_quorum(account) {
			self.remember_account(account);
			return Ok(self);
		}
		if account.is_multi_sig() {
			return Err(WalletError::MultiSigThreshold.into());
		}
		if account.key_pair().is_none() {
			return Err(WalletError::NoPrivateKey.into());
		}
		self.remember_account(account);
		Ok(self)
	}

	/// Checks that every signer has a registered signing account.
	pub fn sign_with_all(&mut self) -> Result<&mut Self, TransactionError> {
		for signer in &self.signers {
			if !self
				.signing_accounts
				.iter()
				.any(|a| a.get_script_hash() == signer.account)
			{
				return Err(WalletError::NoPrivateKey.into());
			}
		}
		Ok(self)
	}

	fn remember_account(&mut self, account: &Account) {
		if !self
			.signing_accounts
			.iter()
			.any(|a| a.get_script_hash() == account.get_script_hash())
		{
			self.signing_accounts.push(account.clone());
		}
	}

	fn client(&self) -> Result<&'a RpcClient<P>, TransactionError> {
		self.client.ok_or_else(|| {
			TransactionError::IllegalState("no RPC client configured".to_string())
		})
	}

	/// Runs all validations and the fee negotiation, returning the sorted,
	/// unsigned transaction.
	pub fn build_unsigned(&mut self) -> Result<Transaction, TransactionError> {
		let script = match &self.script {
			Some(script) if !script.is_empty() => script.clone(),
			_ => return Err(TransactionError::NoScript),
		};
		if self.signers.is_empty() {
			return Err(TransactionError::NoSigners);
		}
		let accounts: HashSet<&H160> = self.signers.iter().map(|s| &s.account).collect();
		if accounts.len() != self.signers.len() {
			return Err(TransactionError::DuplicateSigner);
		}
		if self.attributes.len() > NeoConstants::MAX_TRANSACTION_ATTRIBUTES {
			return Err(TransactionError::AttributeLimit);
		}
		if self.is_high_priority() && !self.signed_by_committee_member()? {
			return Err(TransactionError::HighPriorityNotAllowed);
		}

		let valid_until_block = match self.valid_until_block {
			Some(block) => block,
			None => {
				self.client()?.get_block_count()?
					+ NeoConstants::MAX_VALID_UNTIL_BLOCK_INCREMENT
			},
		};

		let system_fee = self.get_system_fee(&script)? + self.additional_system_fee as i64;

		let mut tx = Transaction {
			version: self.version,
			nonce: self.nonce,
			system_fee,
			network_fee: 0,
			valid_until_block,
			signers: self.signers.clone(),
			attributes: self.attributes.clone(),
			script,
			witnesses: Vec::new(),
		};
		sort_signers(&mut tx.signers);

		tx.network_fee =
			self.get_network_fee(&tx)? + self.additional_network_fee as i64;

		if self.fee_consumer.is_some() || self.fee_error.is_some() {
			let required = tx.system_fee + tx.network_fee;
			let balance = self.get_sender_gas_balance(&tx.signers[0])?;
			if required > balance {
				if let Some(error) = self.fee_error.take() {
					return Err(error);
				}
				if let Some(consumer) = self.fee_consumer.as_mut() {
					consumer(required, balance);
				}
			}
		}

		Ok(tx)
	}

	fn get_system_fee(&self, script: &[u8]) -> Result<i64, TransactionError> {
		let result = self.client()?.invoke_script(&script.to_base64(), &self.signers)?;
		if result.has_state_fault() && !self.allow_transmission_on_fault {
			return Err(TransactionError::ScriptFault(
				result.exception.unwrap_or_else(|| "unknown VM fault".to_string()),
			));
		}
		result
			.gas_consumed
			.parse::<i64>()
			.map_err(|e| TransactionError::IllegalState(format!("gasconsumed: {e}")))
	}

	// Network fee over a provisional transaction carrying one placeholder
	// witness per signer, built from the signing account's verification
	// script where one is registered.
	fn get_network_fee(&self, tx: &Transaction) -> Result<i64, TransactionError> {
		let mut provisional = tx.clone();
		for signer in &provisional.signers {
			let verification = self
				.signing_accounts
				.iter()
				.find(|a| a.get_script_hash() == signer.account)
				.and_then(|a| a.verification_script().clone())
				.unwrap_or_else(VerificationScript::empty);
			provisional
				.witnesses
				.push(Witness::new(Default::default(), verification));
		}
		let fee = self
			.client()?
			.calculate_network_fee(&provisional.to_array().to_base64())?;
		Ok(fee)
	}

	fn get_sender_gas_balance(&self, sender: &Signer) -> Result<i64, TransactionError> {
		let result = self.client()?.invoke_function(
			&GAS_TOKEN_HASH,
			BALANCE_OF_FUNCTION,
			&[ContractParameter::h160(&sender.account)],
			None,
		)?;
		result
			.stack
			.first()
			.and_then(|item| item.as_int())
			.ok_or_else(|| {
				TransactionError::IllegalState("balanceOf returned no integer".to_string())
			})
	}

	fn signed_by_committee_member(&self) -> Result<bool, TransactionError> {
		let committee: HashSet<H160> = self
			.client()?
			.get_committee()?
			.iter()
			.filter_map(|key| {
				VerificationScript::from_encoded_public_key(&hex::decode(key).ok()?)
					.ok()
					.map(|script| script.hash())
			})
			.collect();

		for signer in &self.signers {
			if committee.contains(&signer.account) {
				return Ok(true);
			}
		}
		// A multi-sig signer qualifies when its quorum includes a member.
		for account in &self.signing_accounts {
			if !account.is_multi_sig() {
				continue;
			}
			if let Some(script) = account.verification_script() {
				if let Ok(keys) = script.get_public_keys() {
					let hit = keys.iter().any(|key| {
						committee
							.contains(&VerificationScript::from_public_key(key).hash())
					});
					if hit {
						return Ok(true);
					}
				}
			}
		}
		Ok(false)
	}

	/// Builds the unsigned transaction and installs one witness per signer:
	/// account keys sign the transaction id directly, and accounts with
	/// collected signatures get their invocation composed from them.
	pub fn build_and_sign(&mut self) -> Result<Transaction, TransactionError> {
		let mut tx = self.build_unsigned()?;
		let tx_id = tx.hash();

		for signer in tx.signers.clone() {
			let account = self
				.signing_accounts
				.iter()
				.find(|a| a.get_script_hash() == signer.account)
				.ok_or(WalletError::NoPrivateKey)?;
			let witness = self.create_witness(account, &tx_id)?;
			tx.add_witness(witness);
		}
		sort_witnesses(&mut tx)?;
		Ok(tx)
	}

	// Composes a witness: collected signatures in sorted-key order when
	// present, otherwise a fresh signature from the account's key pair.
	fn create_witness(&self, account: &Account, tx_id: &H256) -> Result<Witness, TransactionError> {
		if self.has_collected_quorum(account) {
			let Some(script) = account.verification_script().clone() else {
				return Err(WalletError::NoPrivateKey.into());
			};
			let threshold = script.get_signing_threshold()?;
			let mut collected = self
				.collected_signatures
				.get(&account.get_script_hash())
				.cloned()
				.unwrap_or_default();
			collected.sort_by(|(a, _), (b, _)| a.cmp(b));
			let signatures: Vec<Secp256r1Signature> = collected
				.into_iter()
				.take(threshold as usize)
				.map(|(_, signature)| signature)
				.collect();
			return Ok(Witness::create_multi_sig_witness(signatures, script)?);
		}
		if account.is_multi_sig() {
			return Err(WalletError::MultiSigThreshold.into());
		}
		if account.is_locked() {
			return Err(WalletError::AccountLocked.into());
		}
		let key_pair = account.key_pair().as_ref().ok_or(WalletError::NoPrivateKey)?;
		Ok(Witness::create(tx_id, key_pair)?)
	}
}

impl<P: JsonRpcTransport> Default for TransactionBuilder<'_, P> {
	fn default() -> Self {
		Self::new()
	}
}

fn random_nonce() -> u32 {
	let mut rng = rand::rngs::OsRng;
	match rng.next_u32() {
		0 => 1,
		nonce => nonce,
	}
}

/// Sorts signers by scope bits ascending, then account bytes ascending.
pub fn sort_signers(signers: &mut [Signer]) {
	signers.sort_by(|a, b| {
		a.scopes_byte()
			.cmp(&b.scopes_byte())
			.then_with(|| a.account.as_bytes().cmp(b.account.as_bytes()))
	});
}

/// Reorders witnesses so each sits at its signer's position.
pub(crate) fn sort_witnesses(tx: &mut Transaction) -> Result<(), TransactionError> {
	if tx.witnesses.len() != tx.signers.len() {
		return Err(TransactionError::WitnessSignerMismatch {
			witnesses: tx.witnesses.len(),
			signers: tx.signers.len(),
		});
	}
	let mut sorted = Vec::with_capacity(tx.witnesses.len());
	for signer in &tx.signers {
		let witness = tx
			.witnesses
			.iter()
			.find(|w| {
				w.verification_script.is_empty() || w.script_hash() == signer.account
			})
			.cloned()
			.ok_or(TransactionError::WitnessSignerMismatch {
				witnesses: tx.witnesses.len(),
				signers: tx.signers.len(),
			})?;
		sorted.push(witness);
	}
	tx.witnesses = sorted;
	Ok(())
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::neo_clients::mock::MockTransport;
	use crate::neo_crypto::KeyPair;

	fn halt_invocation(gas: &str) -> serde_json::Value {
		json!({
			"script": "IQ==",
			"state": "HALT",
			"gasconsumed": gas,
			"stack": [],
		})
	}

	fn client_for_happy_path() -> RpcClient<MockTransport> {
		let mock = MockTransport::new();
		mock.respond_with("invokescript", halt_invocation("1007390"));
		mock.respond_with("calculatenetworkfee", json!({"networkfee": "1230610"}));
		mock.respond_with("getblockcount", json!(1000));
		RpcClient::new(mock)
	}

	fn sample_account() -> Account {
		Account::from_wif("L3yRvfEowWQx7VvH5n45T54rkmbwKjSP728m913EdKQVUNMebQNv").unwrap()
	}

	#[test]
	fn build_fails_without_script() {
		let client = client_for_happy_path();
		let mut builder = TransactionBuilder::with_client(&client);
		builder
			.add_signer(Signer::called_by_entry(ScriptHash::from_low_u64_be(1)))
			.unwrap();
		assert!(matches!(builder.build_unsigned().unwrap_err(), TransactionError::NoScript));

		builder.script(vec![]);
		assert!(matches!(builder.build_unsigned().unwrap_err(), TransactionError::NoScript));
	}

	#[test]
	fn build_fails_without_signers() {
		let client = client_for_happy_path();
		let mut builder = TransactionBuilder::with_client(&client);
		builder.script(vec![0x21]);
		assert!(matches!(builder.build_unsigned().unwrap_err(), TransactionError::NoSigners));
	}

	#[test]
	fn duplicate_signers_are_rejected() {
		let client = client_for_happy_path();
		let mut builder = TransactionBuilder::with_client(&client);
		let hash = ScriptHash::from_low_u64_be(7);
		builder.add_signer(Signer::called_by_entry(hash)).unwrap();
		assert!(matches!(
			builder.add_signer(Signer::global(hash)).unwrap_err(),
			TransactionError::DuplicateSigner
		));
		assert!(matches!(
			builder
				.signers(vec![Signer::called_by_entry(hash), Signer::global(hash)])
				.unwrap_err(),
			TransactionError::DuplicateSigner
		));
	}

	#[test]
	fn attribute_limit_is_enforced() {
		let client = client_for_happy_path();
		let mut builder = TransactionBuilder::with_client(&client);
		for height in 0..NeoConstants::MAX_TRANSACTION_ATTRIBUTES as u32 {
			builder
				.add_attribute(TransactionAttribute::NotValidBefore { height })
				.unwrap();
		}
		assert!(matches!(
			builder
				.add_attribute(TransactionAttribute::NotValidBefore { height: 999 })
				.unwrap_err(),
			TransactionError::AttributeLimit
		));
	}

	#[test]
	fn high_priority_attribute_is_deduplicated() {
		let client = client_for_happy_path();
		let mut builder = TransactionBuilder::with_client(&client);
		builder.high_priority(true).unwrap();
		builder.high_priority(true).unwrap();
		assert_eq!(builder.attributes.len(), 1);
		builder.high_priority(false).unwrap();
		assert!(builder.attributes.is_empty());
	}

	#[test]
	fn fee_negotiation_follows_the_protocol() {
		let client = client_for_happy_path();
		let account = sample_account();
		let mut builder = TransactionBuilder::with_client(&client);
		builder.nonce(12_345_678);
		builder.script(vec![0x21]);
		builder
			.add_signer_account(&account, vec![WitnessScope::CalledByEntry])
			.unwrap();
		builder.additional_system_fee(100).additional_network_fee(200);

		let tx = builder.build_unsigned().unwrap();
		assert_eq!(tx.system_fee, 1_007_390 + 100);
		assert_eq!(tx.network_fee, 1_230_610 + 200);
		// valid-until defaults to the queried height plus the window.
		assert_eq!(
			tx.valid_until_block,
			1000 + NeoConstants::MAX_VALID_UNTIL_BLOCK_INCREMENT
		);
		assert!(tx.witnesses.is_empty());

		// invokescript got the base64 script and the signer list.
		let requests = client.transport().requests();
		let invoke = requests
			.iter()
			.find(|r| r["method"] == "invokescript")
			.unwrap();
		assert_eq!(invoke["params"][0], vec![0x21u8].to_base64());
		assert_eq!(
			invoke["params"][1][0]["account"],
			ScriptHashExtension::to_hex(&account.get_script_hash())
		);
		// calculatenetworkfee got a provisional transaction with one
		// placeholder witness per signer.
		let fee_request = requests
			.iter()
			.find(|r| r["method"] == "calculatenetworkfee")
			.unwrap();
		let tx_base64 = fee_request["params"][0].as_str().unwrap();
		let bytes = crate::neo_types::base64_decode(tx_base64).unwrap();
		let mut reader = crate::neo_codec::Decoder::new(&bytes);
		let provisional = Transaction::decode(&mut reader).unwrap();
		assert_eq!(provisional.witnesses.len(), 1);
		assert_eq!(
			provisional.witnesses[0].verification_script,
			account.verification_script().clone().unwrap()
		);
	}

	#[test]
	fn faulted_scripts_are_rejected_unless_allowed() {
		let mock = MockTransport::new();
		mock.respond_with(
			"invokescript",
			json!({
				"state": "FAULT",
				"gasconsumed": "100",
				"exception": "shift out of range",
				"stack": [],
			}),
		);
		mock.respond_with("calculatenetworkfee", json!({"networkfee": "10"}));
		let client = RpcClient::new(mock);

		let mut builder = TransactionBuilder::with_client(&client);
		builder.script(vec![0x21]);
		builder
			.add_signer(Signer::called_by_entry(ScriptHash::from_low_u64_be(1)))
			.unwrap();
		builder.valid_until_block(100).unwrap();

		match builder.build_unsigned().unwrap_err() {
			TransactionError::ScriptFault(reason) => assert_eq!(reason, "shift out of range"),
			other => panic!("unexpected error {other}"),
		}

		builder.allow_transmission_on_fault();
		let tx = builder.build_unsigned().unwrap();
		assert_eq!(tx.system_fee, 100);
	}

	#[test]
	fn high_priority_requires_committee_signer() {
		let committee_account = sample_account();
		let committee_key =
			committee_account.key_pair().as_ref().unwrap().public_key().get_encoded_compressed_hex();

		let mock = MockTransport::new();
		mock.respond_with("getcommittee", json!([committee_key]));
		mock.respond_with("invokescript", halt_invocation("100"));
		mock.respond_with("calculatenetworkfee", json!({"networkfee": "10"}));
		let client = RpcClient::new(mock);

		// A lone non-committee signer is rejected.
		let mut builder = TransactionBuilder::with_client(&client);
		builder.script(vec![0x21]);
		builder.valid_until_block(100).unwrap();
		builder.high_priority(true).unwrap();
		builder
			.add_signer(Signer::called_by_entry(ScriptHash::from_low_u64_be(42)))
			.unwrap();
		assert!(matches!(
			builder.build_unsigned().unwrap_err(),
			TransactionError::HighPriorityNotAllowed
		));

		// Adding the committee member as a signer fixes it.
		builder
			.add_signer(Signer::called_by_entry(committee_account.get_script_hash()))
			.unwrap();
		assert!(builder.build_unsigned().is_ok());
	}

	#[test]
	fn insufficient_funds_policy_error() {
		let mock = MockTransport::new();
		mock.respond_with("invokescript", halt_invocation("900000"));
		mock.respond_with("calculatenetworkfee", json!({"networkfee": "200000"}));
		mock.respond_with(
			"invokefunction",
			json!({
				"state": "HALT",
				"gasconsumed": "1",
				"stack": [{"type": "Integer", "value": "1000"}],
			}),
		);
		let client = RpcClient::new(mock);

		let mut builder = TransactionBuilder::with_client(&client);
		builder.script(vec![0x21]);
		builder
			.add_signer(Signer::called_by_entry(ScriptHash::from_low_u64_be(9)))
			.unwrap();
		builder.valid_until_block(100).unwrap();
		builder
			.fail_on_insufficient_funds(TransactionError::InsufficientFunds {
				required: 1_100_000,
				available: 1000,
			})
			.unwrap();

		assert!(matches!(
			builder.build_unsigned().unwrap_err(),
			TransactionError::InsufficientFunds { required: 1_100_000, available: 1000 }
		));
	}

	#[test]
	fn insufficient_funds_policy_consumer() {
		let mock = MockTransport::new();
		mock.respond_with("invokescript", halt_invocation("900000"));
		mock.respond_with("calculatenetworkfee", json!({"networkfee": "200000"}));
		mock.respond_with(
			"invokefunction",
			json!({
				"state": "HALT",
				"gasconsumed": "1",
				"stack": [{"type": "Integer", "value": "1000"}],
			}),
		);
		let client = RpcClient::new(mock);

		let observed = std::rc::Rc::new(std::cell::Cell::new((0i64, 0i64)));
		let observed_clone = std::rc::Rc::clone(&observed);

		let mut builder = TransactionBuilder::with_client(&client);
		builder.script(vec![0x21]);
		builder
			.add_signer(Signer::called_by_entry(ScriptHash::from_low_u64_be(9)))
			.unwrap();
		builder.valid_until_block(100).unwrap();
		builder
			.on_insufficient_funds(move |required, balance| {
				observed_clone.set((required, balance));
			})
			.unwrap();

		let tx = builder.build_unsigned().unwrap();
		assert_eq!(tx.system_fee + tx.network_fee, 1_100_000);
		assert_eq!(observed.get(), (1_100_000, 1000));
	}

	#[test]
	fn fee_policies_are_mutually_exclusive() {
		let client = client_for_happy_path();
		let mut builder = TransactionBuilder::with_client(&client);
		builder.on_insufficient_funds(|_, _| {}).unwrap();
		assert!(builder
			.fail_on_insufficient_funds(TransactionError::NoSigners)
			.is_err());

		let mut builder = TransactionBuilder::<MockTransport>::new();
		builder
			.fail_on_insufficient_funds(TransactionError::NoSigners)
			.unwrap();
		assert!(builder.on_insufficient_funds(|_, _| {}).is_err());
	}

	#[test]
	fn signers_are_sorted_by_scope_then_account() {
		let client = client_for_happy_path();
		let mut builder = TransactionBuilder::with_client(&client);
		builder.script(vec![0x21]);
		builder.valid_until_block(100).unwrap();

		let global = Signer::global(ScriptHash::from_low_u64_be(1));
		let entry_high = Signer::called_by_entry(ScriptHash::from_low_u64_be(0xFF));
		let entry_low = Signer::called_by_entry(ScriptHash::from_low_u64_be(0x01));
		builder.add_signer(global.clone()).unwrap();
		builder.add_signer(entry_high.clone()).unwrap();
		builder.add_signer(entry_low.clone()).unwrap();

		let tx = builder.build_unsigned().unwrap();
		assert_eq!(tx.signers, vec![entry_low, entry_high, global]);
	}

	#[test]
	fn build_and_sign_installs_matching_witnesses() {
		let client = client_for_happy_path();
		let account = sample_account();
		let mut builder = TransactionBuilder::with_client(&client);
		builder.nonce(12_345_678);
		builder.script(vec![0x21]);
		builder.valid_until_block(1_000_000).unwrap();
		builder
			.add_signer_account(&account, vec![WitnessScope::CalledByEntry])
			.unwrap();
		builder.sign_with(&account).unwrap();

		let tx = builder.build_and_sign().unwrap();
		assert_eq!(tx.witnesses.len(), tx.signers.len());
		assert_eq!(tx.witnesses[0].script_hash(), account.get_script_hash());

		// The id is a pure function of the unsigned form.
		let mut unsigned = tx.clone();
		unsigned.witnesses.clear();
		assert_eq!(unsigned.hash(), tx.hash());

		// The installed signature verifies against the id.
		let signatures = tx.witnesses[0].invocation_script.get_signatures().unwrap();
		let public_key = account.key_pair().as_ref().unwrap().public_key();
		assert!(public_key.verify_hash(tx.hash().as_bytes(), &signatures[0]).is_ok());

		// And the signed form passes the submission checks.
		assert!(tx.serialize_checked().is_ok());
	}

	#[test]
	fn sign_with_rejects_locked_and_foreign_accounts() {
		let client = client_for_happy_path();
		let account = sample_account();
		let mut builder = TransactionBuilder::with_client(&client);
		builder.script(vec![0x21]);

		// No signer registered for the account yet.
		assert!(builder.sign_with(&account).is_err());

		builder
			.add_signer(Signer::called_by_entry(account.get_script_hash()))
			.unwrap();

		let mut locked = account.clone();
		locked
			.encrypt_private_key_with_params(
				"pw",
				crate::neo_protocol::ScryptParamsDef { n: 256, r: 1, p: 1 },
			)
			.unwrap();
		assert!(matches!(
			builder.sign_with(&locked).unwrap_err(),
			TransactionError::Wallet(WalletError::AccountLocked)
		));

		builder.sign_with(&account).unwrap();
		assert!(builder.sign_with_all().is_ok());
	}

	#[test]
	fn multi_sig_without_quorum_cannot_sign() {
		let client = client_for_happy_path();
		let pairs: Vec<KeyPair> = (0..3).map(|_| KeyPair::new_random()).collect();
		let keys: Vec<_> = pairs.iter().map(|p| p.public_key().clone()).collect();
		let account = Account::multi_sig_from_public_keys(&keys, 2).unwrap();

		let mut builder = TransactionBuilder::with_client(&client);
		builder.script(vec![0x21]);
		builder
			.add_signer(Signer::called_by_entry(account.get_script_hash()))
			.unwrap();
		assert!(matches!(
			builder.sign_with(&account).unwrap_err(),
			TransactionError::Wallet(WalletError::MultiSigThreshold)
		));

		// One signature out of two is still short of the quorum, both for
		// sign_with and for witness creation at build time.
		let signature = pairs[0].sign_hash(&[0u8; 32]).unwrap();
		builder
			.add_signature(&account, pairs[0].public_key(), signature)
			.unwrap();
		assert!(matches!(
			builder.sign_with(&account).unwrap_err(),
			TransactionError::Wallet(WalletError::MultiSigThreshold)
		));
		builder.valid_until_block(100).unwrap();
		assert!(matches!(
			builder.build_and_sign().unwrap_err(),
			TransactionError::Wallet(WalletError::MultiSigThreshold)
		));
	}

	#[test]
	fn multi_sig_witness_from_collected_signatures() {
		let client = client_for_happy_path();
		let mut pairs: Vec<KeyPair> = (0..3).map(|_| KeyPair::new_random()).collect();
		// Sort the participants the way the script will, so indices below
		// line up with the emitted key order.
		pairs.sort_by(|a, b| a.public_key().cmp(b.public_key()));
		let keys: Vec<_> = pairs.iter().map(|p| p.public_key().clone()).collect();
		let account = Account::multi_sig_from_public_keys(&keys, 2).unwrap();

		let mut builder = TransactionBuilder::with_client(&client);
		builder.nonce(12_345_678);
		builder.script(vec![0x21]);
		builder.valid_until_block(1_000_000).unwrap();
		builder
			.add_signer(Signer::called_by_entry(account.get_script_hash()))
			.unwrap();

		// The participants sign the negotiated unsigned form out of band.
		let unsigned = builder.build_unsigned().unwrap();
		let tx_id = unsigned.hash();
		let sig_of = |pair: &KeyPair| pair.sign_hash(tx_id.as_bytes()).unwrap();

		// Collected out of key order on purpose.
		builder
			.add_signature(&account, pairs[2].public_key(), sig_of(&pairs[2]))
			.unwrap();
		builder
			.add_signature(&account, pairs[0].public_key(), sig_of(&pairs[0]))
			.unwrap();
		builder.sign_with(&account).unwrap();

		let tx = builder.build_and_sign().unwrap();
		assert_eq!(tx.hash(), tx_id);
		assert_eq!(tx.witnesses.len(), 1);
		let witness = &tx.witnesses[0];
		assert_eq!(witness.script_hash(), account.get_script_hash());

		// The invocation concatenates the signatures in sorted-key order.
		let signatures = witness.invocation_script.get_signatures().unwrap();
		assert_eq!(signatures.len(), 2);
		assert!(pairs[0].public_key().verify_hash(tx_id.as_bytes(), &signatures[0]).is_ok());
		assert!(pairs[2].public_key().verify_hash(tx_id.as_bytes(), &signatures[1]).is_ok());
		assert!(tx.serialize_checked().is_ok());
	}

	#[test]
	fn single_sig_witness_from_collected_signature() {
		let client = client_for_happy_path();
		let key_pair = KeyPair::new_random();
		// Watch-only: the builder never sees the private key.
		let account = Account::from_public_key(key_pair.public_key());

		let mut builder = TransactionBuilder::with_client(&client);
		builder.nonce(1);
		builder.script(vec![0x21]);
		builder.valid_until_block(1_000_000).unwrap();
		builder
			.add_signer(Signer::called_by_entry(account.get_script_hash()))
			.unwrap();

		let tx_id = builder.build_unsigned().unwrap().hash();
		let signature = key_pair.sign_hash(tx_id.as_bytes()).unwrap();
		builder
			.add_signature(&account, key_pair.public_key(), signature)
			.unwrap();
		builder.sign_with(&account).unwrap();

		let tx = builder.build_and_sign().unwrap();
		assert_eq!(tx.hash(), tx_id);
		assert_eq!(tx.witnesses[0].script_hash(), account.get_script_hash());
	}

	#[test]
	fn add_signature_rejects_foreign_keys() {
		let client = client_for_happy_path();
		let keys: Vec<_> = (0..2)
			.map(|_| KeyPair::new_random().public_key().clone())
			.collect();
		let account = Account::multi_sig_from_public_keys(&keys, 1).unwrap();

		let mut builder = TransactionBuilder::with_client(&client);
		builder.script(vec![0x21]);
		builder
			.add_signer(Signer::called_by_entry(account.get_script_hash()))
			.unwrap();

		let outsider = KeyPair::new_random();
		let signature = outsider.sign_hash(&[0u8; 32]).unwrap();
		assert!(matches!(
			builder
				.add_signature(&account, outsider.public_key(), signature)
				.unwrap_err(),
			TransactionError::Type(TypeError::InvalidArgument(_))
		));
	}

	#[test]
	fn relative_validity_queries_the_node_once() {
		let client = client_for_happy_path();
		let mut builder = TransactionBuilder::with_client(&client);
		builder.valid_until_block_relative(50).unwrap();
		assert_eq!(builder.valid_until_block, Some(1050));
		assert_eq!(client.transport().calls_of("getblockcount"), 1);
	}

	#[test]
	fn random_nonce_is_never_zero() {
		for _ in 0..16 {
			assert_ne!(random_nonce(), 0);
		}
	}
}
