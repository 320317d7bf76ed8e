//! The transaction model.
//!
//! The id is the double SHA-256 of the unsigned serialization; adding or
//! replacing witnesses never changes it.

use primitive_types::H256;
use serde::{Deserialize, Serialize};

use crate::neo_builder::{Signer, TransactionAttribute, TransactionError, Witness};
use crate::neo_codec::{Decoder, Encoder, NeoSerializable, VarSizeTrait};
use crate::neo_config::NeoConstants;
use crate::neo_crypto::HashableForVec;
use crate::neo_types::{deserialize_base64, serialize_base64, Bytes, Hash256Extension};

/// A Neo N3 transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
	pub version: u8,
	pub nonce: u32,
	#[serde(rename = "sysfee")]
	pub system_fee: i64,
	#[serde(rename = "netfee")]
	pub network_fee: i64,
	#[serde(rename = "validuntilblock")]
	pub valid_until_block: u32,
	pub signers: Vec<Signer>,
	pub attributes: Vec<TransactionAttribute>,
	#[serde(serialize_with = "serialize_base64", deserialize_with = "deserialize_base64")]
	pub script: Bytes,
	pub witnesses: Vec<Witness>,
}

impl Transaction {
	/// Fixed header bytes: version, nonce, both fees, valid-until.
	pub const HEADER_SIZE: usize = 25;

	pub fn new() -> Self {
		Self { version: NeoConstants::CURRENT_TX_VERSION, ..Default::default() }
	}

	pub fn add_witness(&mut self, witness: Witness) {
		self.witnesses.push(witness);
	}

	fn serialize_without_witnesses(&self, writer: &mut Encoder) {
		writer.write_u8(self.version);
		writer.write_u32(self.nonce);
		writer.write_i64(self.system_fee);
		writer.write_i64(self.network_fee);
		writer.write_u32(self.valid_until_block);
		writer.write_serializable_variable_list(&self.signers);
		writer.write_serializable_variable_list(&self.attributes);
		writer.write_var_bytes(&self.script);
	}

	/// The unsigned serialization signatures commit to.
	pub fn get_hash_data(&self) -> Bytes {
		let mut writer = Encoder::new();
		self.serialize_without_witnesses(&mut writer);
		writer.into_bytes()
	}

	/// The transaction id: `HASH256` of the unsigned serialization.
	pub fn hash(&self) -> H256 {
		H256::from_slice(&self.get_hash_data().hash256())
	}

	/// The id as lowercase big-endian hex.
	pub fn tx_id(&self) -> String {
		Hash256Extension::to_hex(&self.hash())
	}

	/// Serializes for submission, enforcing the witness pairing and size
	/// invariants.
	pub fn serialize_checked(&self) -> Result<Bytes, TransactionError> {
		if self.witnesses.len() != self.signers.len() {
			return Err(TransactionError::WitnessSignerMismatch {
				witnesses: self.witnesses.len(),
				signers: self.signers.len(),
			});
		}
		let bytes = self.to_array();
		if bytes.len() > NeoConstants::MAX_TRANSACTION_SIZE {
			return Err(TransactionError::TransactionTooLarge { size: bytes.len() });
		}
		Ok(bytes)
	}
}

impl NeoSerializable for Transaction {
	type Error = TransactionError;

	fn size(&self) -> usize {
		Transaction::HEADER_SIZE
			+ self.signers.var_size()
			+ self.attributes.var_size()
			+ self.script.as_slice().var_size()
			+ self.witnesses.var_size()
	}

	fn encode(&self, writer: &mut Encoder) {
		self.serialize_without_witnesses(writer);
		// The witness array is always present; unsigned transactions carry
		// a zero count byte.
		writer.write_serializable_variable_list(&self.witnesses);
	}

	fn decode(reader: &mut Decoder<'_>) -> Result<Self, Self::Error> {
		let version = reader.read_u8()?;
		let nonce = reader.read_u32()?;
		let system_fee = reader.read_i64()?;
		let network_fee = reader.read_i64()?;
		let valid_until_block = reader.read_u32()?;
		let signers = reader.read_serializable_list::<Signer>()?;
		let attributes = reader.read_serializable_list::<TransactionAttribute>()?;
		if attributes.len() > NeoConstants::MAX_TRANSACTION_ATTRIBUTES {
			return Err(TransactionError::AttributeLimit);
		}
		let script = reader.read_var_bytes()?;
		let witnesses = reader.read_serializable_list::<Witness>()?;
		Ok(Self {
			version,
			nonce,
			system_fee,
			network_fee,
			valid_until_block,
			signers,
			attributes,
			script,
			witnesses,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::neo_crypto::KeyPair;
	use crate::neo_types::ScriptHashExtension;
	use primitive_types::H160;

	fn sample_transaction() -> Transaction {
		Transaction {
			version: 0,
			nonce: 12_345_678,
			system_fee: 100_000,
			network_fee: 200_000,
			valid_until_block: 1_000_000,
			signers: vec![Signer::called_by_entry(
				H160::from_hex("23ba2703c53263e8d6e522dc32203339dcd8eee9").unwrap(),
			)],
			attributes: vec![],
			script: vec![0x21], // PUSH1
			witnesses: vec![],
		}
	}

	#[test]
	fn header_layout_is_little_endian() {
		let tx = sample_transaction();
		let bytes = tx.get_hash_data();
		assert_eq!(bytes[0], 0); // version
		assert_eq!(u32::from_le_bytes(bytes[1..5].try_into().unwrap()), 12_345_678);
		assert_eq!(i64::from_le_bytes(bytes[5..13].try_into().unwrap()), 100_000);
		assert_eq!(i64::from_le_bytes(bytes[13..21].try_into().unwrap()), 200_000);
		assert_eq!(u32::from_le_bytes(bytes[21..25].try_into().unwrap()), 1_000_000);
		// one signer, account bytes big-endian
		assert_eq!(bytes[25], 1);
		assert_eq!(
			hex::encode(&bytes[26..46]),
			"23ba2703c53263e8d6e522dc32203339dcd8eee9"
		);
		assert_eq!(bytes[46], 0x01); // CalledByEntry
		assert_eq!(bytes[47], 0); // no attributes
		assert_eq!(bytes[48], 1); // script length
		assert_eq!(bytes[49], 0x21);
	}

	#[test]
	fn id_is_stable_across_witnesses() {
		let mut tx = sample_transaction();
		let unsigned_id = tx.hash();

		let key_pair = KeyPair::new_random();
		let witness = Witness::create(&unsigned_id, &key_pair).unwrap();
		tx.add_witness(witness);

		assert_eq!(tx.hash(), unsigned_id);
		assert_eq!(tx.tx_id(), Hash256Extension::to_hex(&unsigned_id));
	}

	#[test]
	fn id_is_double_sha_of_unsigned_form() {
		let tx = sample_transaction();
		let expected = tx.get_hash_data().hash256();
		assert_eq!(tx.hash().as_bytes(), expected.as_slice());
	}

	#[test]
	fn wire_round_trip() {
		let mut tx = sample_transaction();
		tx.attributes.push(TransactionAttribute::HighPriority);
		let key_pair = KeyPair::new_random();
		tx.add_witness(Witness::create(&tx.hash(), &key_pair).unwrap());

		let bytes = tx.to_array();
		assert_eq!(bytes.len(), tx.size());
		let mut reader = Decoder::new(&bytes);
		let decoded = Transaction::decode(&mut reader).unwrap();
		assert_eq!(decoded, tx);
	}

	#[test]
	fn unsigned_form_carries_a_zero_witness_count() {
		let tx = sample_transaction();
		let bytes = tx.to_array();
		assert_eq!(bytes.len(), tx.size());
		assert_eq!(bytes.len(), tx.get_hash_data().len() + 1);
		assert_eq!(*bytes.last().unwrap(), 0x00);

		let mut reader = Decoder::new(&bytes);
		let decoded = Transaction::decode(&mut reader).unwrap();
		assert!(decoded.witnesses.is_empty());
		assert_eq!(decoded, tx);
	}

	#[test]
	fn checked_serialization_requires_witness_pairing() {
		let tx = sample_transaction();
		assert!(matches!(
			tx.serialize_checked().unwrap_err(),
			TransactionError::WitnessSignerMismatch { witnesses: 0, signers: 1 }
		));
	}

	#[test]
	fn oversized_transaction_is_rejected() {
		let mut tx = sample_transaction();
		tx.script = vec![0u8; NeoConstants::MAX_TRANSACTION_SIZE];
		let key_pair = KeyPair::new_random();
		tx.add_witness(Witness::create(&tx.hash(), &key_pair).unwrap());
		assert!(matches!(
			tx.serialize_checked().unwrap_err(),
			TransactionError::TransactionTooLarge { .. }
		));
	}
}
