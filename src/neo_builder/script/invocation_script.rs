//! Invocation scripts, the signature half of a witness.
//!
//! Each signature is pushed as `PUSHDATA1 0x40 <sig64>`; a multi-sig
//! invocation is the concatenation of those pushes in sorted-key order.

use serde::{Deserialize, Serialize};

use crate::neo_codec::{CodecError, Decoder, Encoder, NeoSerializable, VarSizeTrait};
use crate::neo_config::NeoConstants;
use crate::neo_crypto::Secp256r1Signature;
use crate::neo_types::{Bytes, OpCode};

/// The program pushing the signatures that satisfy a verification script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationScript {
	script: Bytes,
}

impl InvocationScript {
	pub fn from_bytes(script: Bytes) -> Self {
		Self { script }
	}

	pub fn empty() -> Self {
		Self { script: Vec::new() }
	}

	/// Builds the single-signature invocation.
	pub fn from_signature(signature: &Secp256r1Signature) -> Self {
		Self::from_signatures(std::slice::from_ref(signature))
	}

	/// Builds the invocation pushing each signature in order.
	pub fn from_signatures(signatures: &[Secp256r1Signature]) -> Self {
		let mut script = Vec::with_capacity(signatures.len() * (2 + NeoConstants::SIGNATURE_SIZE));
		for signature in signatures {
			script.push(OpCode::PushData1.opcode());
			script.push(NeoConstants::SIGNATURE_SIZE as u8);
			script.extend_from_slice(&signature.to_bytes());
		}
		Self { script }
	}

	pub fn script(&self) -> &Bytes {
		&self.script
	}

	pub fn to_bytes(&self) -> Bytes {
		self.script.clone()
	}

	pub fn is_empty(&self) -> bool {
		self.script.is_empty()
	}

	/// Extracts the pushed signatures.
	pub fn get_signatures(&self) -> Result<Vec<Secp256r1Signature>, CodecError> {
		let mut reader = Decoder::new(&self.script);
		let mut signatures = Vec::new();
		while reader.available() > 0 {
			let bytes = reader.read_push_bytes()?;
			let signature = Secp256r1Signature::from_bytes(&bytes)
				.map_err(|e| CodecError::InvalidData(e.to_string()))?;
			signatures.push(signature);
		}
		Ok(signatures)
	}
}

impl NeoSerializable for InvocationScript {
	type Error = CodecError;

	fn size(&self) -> usize {
		self.script.as_slice().var_size()
	}

	fn encode(&self, writer: &mut Encoder) {
		writer.write_var_bytes(&self.script);
	}

	fn decode(reader: &mut Decoder<'_>) -> Result<Self, Self::Error> {
		Ok(Self { script: reader.read_var_bytes()? })
	}
}

#[cfg(test)]
mod tests {
	use rand_core::OsRng;

	use super::*;
	use crate::neo_crypto::Secp256r1PrivateKey;

	#[test]
	fn signature_push_layout() {
		let key = Secp256r1PrivateKey::random(&mut OsRng);
		let signature = key.sign_tx(b"message").unwrap();
		let script = InvocationScript::from_signature(&signature);

		let bytes = script.to_bytes();
		assert_eq!(bytes.len(), 66);
		assert_eq!(bytes[0], OpCode::PushData1.opcode());
		assert_eq!(bytes[1], 0x40);
		assert_eq!(bytes[2..], signature.to_bytes());
	}

	#[test]
	fn multiple_signatures_concatenate() {
		let key = Secp256r1PrivateKey::random(&mut OsRng);
		let sig1 = key.sign_tx(b"one").unwrap();
		let sig2 = key.sign_tx(b"two").unwrap();
		let script = InvocationScript::from_signatures(&[sig1.clone(), sig2.clone()]);

		assert_eq!(script.to_bytes().len(), 132);
		assert_eq!(script.get_signatures().unwrap(), vec![sig1, sig2]);
	}
}
