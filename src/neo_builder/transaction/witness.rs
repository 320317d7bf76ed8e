//! Witnesses: the invocation/verification script pair attached per signer.

use primitive_types::{H160, H256};
use serde::{Deserialize, Serialize};

use crate::neo_builder::{InvocationScript, ScriptBuilder, VerificationScript};
use crate::neo_codec::{CodecError, Decoder, Encoder, NeoSerializable};
use crate::neo_crypto::{CryptoError, KeyPair, Secp256r1Signature};
use crate::neo_types::{ContractParameter, TypeError};

/// A witness. For submission, `RIPEMD160(SHA256(verification_script))`
/// must equal the paired signer's account hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Witness {
	#[serde(rename = "invocation")]
	pub invocation_script: InvocationScript,
	#[serde(rename = "verification")]
	pub verification_script: VerificationScript,
}

impl Witness {
	pub fn new(invocation_script: InvocationScript, verification_script: VerificationScript) -> Self {
		Self { invocation_script, verification_script }
	}

	/// Signs the transaction id with `key_pair` and wraps the result in a
	/// single-sig witness.
	pub fn create(tx_id: &H256, key_pair: &KeyPair) -> Result<Self, CryptoError> {
		let signature = key_pair.sign_hash(tx_id.as_bytes())?;
		Ok(Self {
			invocation_script: InvocationScript::from_signature(&signature),
			verification_script: VerificationScript::from_public_key(key_pair.public_key()),
		})
	}

	/// Builds a multi-sig witness from `threshold`-many signatures and the
	/// account's verification script. Signatures must already be ordered by
	/// their keys' sorted order.
	pub fn create_multi_sig_witness(
		signatures: Vec<Secp256r1Signature>,
		verification_script: VerificationScript,
	) -> Result<Self, TypeError> {
		let threshold = verification_script.get_signing_threshold()?;
		if signatures.len() != threshold as usize {
			return Err(TypeError::InvalidArgument(format!(
				"expected exactly {threshold} signatures, got {}",
				signatures.len()
			)));
		}
		Ok(Self {
			invocation_script: InvocationScript::from_signatures(&signatures),
			verification_script,
		})
	}

	/// Builds the witness for a contract signer: the invocation pushes the
	/// contract's `verify` arguments and the verification script is empty.
	pub fn create_contract_witness(params: &[ContractParameter]) -> Result<Self, TypeError> {
		if params.is_empty() {
			return Ok(Self::default());
		}
		let mut builder = ScriptBuilder::new();
		for param in params {
			builder.push_param(param)?;
		}
		Ok(Self {
			invocation_script: InvocationScript::from_bytes(builder.to_bytes()),
			verification_script: VerificationScript::empty(),
		})
	}

	/// The account hash this witness verifies for.
	pub fn script_hash(&self) -> H160 {
		self.verification_script.hash()
	}
}

impl NeoSerializable for Witness {
	type Error = CodecError;

	fn size(&self) -> usize {
		self.invocation_script.size() + self.verification_script.size()
	}

	fn encode(&self, writer: &mut Encoder) {
		self.invocation_script.encode(writer);
		self.verification_script.encode(writer);
	}

	fn decode(reader: &mut Decoder<'_>) -> Result<Self, Self::Error> {
		Ok(Self {
			invocation_script: InvocationScript::decode(reader)?,
			verification_script: VerificationScript::decode(reader)?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::neo_crypto::HashableForVec;
	use crate::neo_types::Hash256Extension;

	#[test]
	fn create_signs_the_transaction_id() {
		let key_pair = KeyPair::new_random();
		let tx_id = H256::from_slice(&b"some unsigned transaction".as_slice().hash256());
		let witness = Witness::create(&tx_id, &key_pair).unwrap();

		let signatures = witness.invocation_script.get_signatures().unwrap();
		assert_eq!(signatures.len(), 1);
		assert!(key_pair.public_key().verify_hash(tx_id.as_bytes(), &signatures[0]).is_ok());
		assert_eq!(witness.script_hash(), key_pair.get_script_hash());
	}

	#[test]
	fn wire_round_trip() {
		let key_pair = KeyPair::new_random();
		let tx_id = H256::from_hex(
			"2d5f3e8f5c7a1b9e4d6c8a2f1e3b5d7c9a1f3e5d7b9c1a3e5f7d9b1c3a5e7f9d",
		)
		.unwrap();
		let witness = Witness::create(&tx_id, &key_pair).unwrap();

		let bytes = witness.to_array();
		assert_eq!(bytes.len(), witness.size());
		let mut reader = Decoder::new(&bytes);
		assert_eq!(Witness::decode(&mut reader).unwrap(), witness);
	}

	#[test]
	fn multi_sig_witness_checks_threshold() {
		let pairs: Vec<KeyPair> = (0..3).map(|_| KeyPair::new_random()).collect();
		let keys: Vec<_> = pairs.iter().map(|p| p.public_key().clone()).collect();
		let script = VerificationScript::from_multi_sig(&keys, 2).unwrap();

		let tx_id = H256::from_slice(&b"tx".as_slice().hash256());
		let signatures: Vec<Secp256r1Signature> =
			pairs.iter().map(|p| p.sign_hash(tx_id.as_bytes()).unwrap()).collect();

		assert!(Witness::create_multi_sig_witness(signatures[..1].to_vec(), script.clone())
			.is_err());
		let witness =
			Witness::create_multi_sig_witness(signatures[..2].to_vec(), script.clone()).unwrap();
		assert_eq!(witness.verification_script, script);
		assert_eq!(witness.invocation_script.get_signatures().unwrap().len(), 2);
	}

	#[test]
	fn contract_witness_has_empty_verification() {
		let witness =
			Witness::create_contract_witness(&[ContractParameter::integer(7)]).unwrap();
		assert!(witness.verification_script.is_empty());
		assert!(!witness.invocation_script.is_empty());
	}
}
