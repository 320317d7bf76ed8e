//! Transaction attributes.

use primitive_types::H256;
use serde::{Deserialize, Serialize};

use crate::neo_codec::{CodecError, Decoder, Encoder, NeoSerializable, VarSizeTrait};
use crate::neo_types::{deserialize_base64, serialize_base64, Bytes};

/// An optional marker or payload attached to a transaction. A transaction
/// carries at most 16 attributes and `HighPriority` at most once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransactionAttribute {
	/// Lifts the transaction ahead of the fee ordering; only committee
	/// members may send it.
	HighPriority,

	/// The response an oracle node attaches to the requesting transaction.
	OracleResponse {
		id: u64,
		#[serde(rename = "code")]
		response_code: u8,
		#[serde(serialize_with = "serialize_base64", deserialize_with = "deserialize_base64")]
		result: Bytes,
	},

	/// The transaction is invalid before this height.
	NotValidBefore { height: u32 },

	/// The transaction conflicts with another by hash.
	Conflicts {
		#[serde(
			serialize_with = "crate::neo_types::serialize_h256",
			deserialize_with = "crate::neo_types::deserialize_h256"
		)]
		hash: H256,
	},
}

impl TransactionAttribute {
	pub fn type_byte(&self) -> u8 {
		match self {
			TransactionAttribute::HighPriority => 0x01,
			TransactionAttribute::OracleResponse { .. } => 0x11,
			TransactionAttribute::NotValidBefore { .. } => 0x20,
			TransactionAttribute::Conflicts { .. } => 0x21,
		}
	}
}

impl NeoSerializable for TransactionAttribute {
	type Error = CodecError;

	fn size(&self) -> usize {
		1 + match self {
			TransactionAttribute::HighPriority => 0,
			TransactionAttribute::OracleResponse { result, .. } => 8 + 1 + result.var_size(),
			TransactionAttribute::NotValidBefore { .. } => 4,
			TransactionAttribute::Conflicts { .. } => 32,
		}
	}

	fn encode(&self, writer: &mut Encoder) {
		writer.write_u8(self.type_byte());
		match self {
			TransactionAttribute::HighPriority => {},
			TransactionAttribute::OracleResponse { id, response_code, result } => {
				writer.write_u64(*id);
				writer.write_u8(*response_code);
				writer.write_var_bytes(result);
			},
			TransactionAttribute::NotValidBefore { height } => writer.write_u32(*height),
			TransactionAttribute::Conflicts { hash } => hash.encode(writer),
		}
	}

	fn decode(reader: &mut Decoder<'_>) -> Result<Self, Self::Error> {
		let type_byte = reader.read_u8()?;
		let attribute = match type_byte {
			0x01 => TransactionAttribute::HighPriority,
			0x11 => TransactionAttribute::OracleResponse {
				id: reader.read_u64()?,
				response_code: reader.read_u8()?,
				result: reader.read_var_bytes()?,
			},
			0x20 => TransactionAttribute::NotValidBefore { height: reader.read_u32()? },
			0x21 => TransactionAttribute::Conflicts { hash: H256::decode(reader)? },
			_ => {
				return Err(CodecError::InvalidDiscriminant(format!(
					"transaction attribute 0x{type_byte:02x}"
				)))
			},
		};
		Ok(attribute)
	}
}
