//! Verification scripts, the public half of a witness.
//!
//! Single-sig form (always exactly 40 bytes):
//! `PUSHDATA1 0x21 <pubkey33> SYSCALL <System.Crypto.CheckSig>`.
//! Multi-sig form: `PUSH<m>` then each sorted public key as
//! `PUSHDATA1 0x21 <pk>`, `PUSH<n>`, `SYSCALL <System.Crypto.CheckMultisig>`.

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::neo_builder::{InteropService, ScriptBuilder};
use crate::neo_codec::{CodecError, Decoder, Encoder, NeoSerializable, VarSizeTrait};
use crate::neo_config::NeoConstants;
use crate::neo_crypto::{CryptoError, Secp256r1PublicKey};
use crate::neo_types::{Bytes, OpCode, ScriptHash, ScriptHashExtension, TypeError};

/// The program proving ownership of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationScript {
	script: Bytes,
}

impl VerificationScript {
	/// Wraps raw script bytes.
	pub fn from_bytes(script: Bytes) -> Self {
		Self { script }
	}

	/// An empty script, used by contract witnesses.
	pub fn empty() -> Self {
		Self { script: Vec::new() }
	}

	/// Builds the single-sig script for a public key.
	pub fn from_public_key(public_key: &Secp256r1PublicKey) -> Self {
		let mut builder = ScriptBuilder::new();
		builder.op_code_with_arg(
			OpCode::PushData1,
			{
				let mut arg = vec![NeoConstants::PUBLIC_KEY_SIZE_COMPRESSED as u8];
				arg.extend(public_key.get_encoded(true));
				arg
			},
		);
		builder.sys_call(InteropService::SystemCryptoCheckSig);
		Self { script: builder.to_bytes() }
	}

	/// Builds the single-sig script from an encoded public key, validating
	/// the point.
	pub fn from_encoded_public_key(public_key: &[u8]) -> Result<Self, CryptoError> {
		Ok(Self::from_public_key(&Secp256r1PublicKey::from_bytes(public_key)?))
	}

	/// Builds the multi-sig script for `threshold` out of `public_keys`.
	/// Keys are sorted ascending by compressed encoding before emission.
	pub fn from_multi_sig(
		public_keys: &[Secp256r1PublicKey],
		threshold: u32,
	) -> Result<Self, TypeError> {
		let n = public_keys.len() as u32;
		if n == 0 || n > NeoConstants::MAX_PUBLIC_KEYS_PER_MULTI_SIG_ACCOUNT {
			return Err(TypeError::InvalidArgument(format!(
				"multi-sig accounts take 1 to {} keys, got {n}",
				NeoConstants::MAX_PUBLIC_KEYS_PER_MULTI_SIG_ACCOUNT
			)));
		}
		if threshold < 1 || threshold > n {
			return Err(TypeError::InvalidArgument(format!(
				"signing threshold {threshold} out of range 1..={n}"
			)));
		}

		let mut sorted = public_keys.to_vec();
		sorted.sort();

		let mut builder = ScriptBuilder::new();
		builder.push_integer(BigInt::from(threshold))?;
		for key in &sorted {
			let mut arg = vec![NeoConstants::PUBLIC_KEY_SIZE_COMPRESSED as u8];
			arg.extend(key.get_encoded(true));
			builder.op_code_with_arg(OpCode::PushData1, arg);
		}
		builder.push_integer(BigInt::from(n))?;
		builder.sys_call(InteropService::SystemCryptoCheckMultiSig);
		Ok(Self { script: builder.to_bytes() })
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

	/// The owning account's script hash.
	pub fn hash(&self) -> ScriptHash {
		ScriptHash::from_script(&self.script)
	}

	/// True for the canonical 40-byte single-sig form.
	pub fn is_single_sig(&self) -> bool {
		self.script.len() == NeoConstants::VERIFICATION_SCRIPT_SIZE
			&& self.script[0] == OpCode::PushData1.opcode()
			&& self.script[1] == NeoConstants::PUBLIC_KEY_SIZE_COMPRESSED as u8
			&& self.script[35] == OpCode::Syscall.opcode()
			&& self.script[36..] == InteropService::SystemCryptoCheckSig.hash()
	}

	/// True for the canonical multi-sig form.
	pub fn is_multi_sig(&self) -> bool {
		self.parse_multi_sig().is_some()
	}

	// (threshold, keys) of a multi-sig script.
	fn parse_multi_sig(&self) -> Option<(u32, Vec<Secp256r1PublicKey>)> {
		let mut reader = Decoder::new(&self.script);
		let threshold = u32::try_from(reader.read_push_int().ok()?).ok()?;
		let mut keys = Vec::new();
		loop {
			reader.mark();
			let Ok(opcode) = reader.read_u8() else { return None };
			if opcode != OpCode::PushData1.opcode() {
				reader.reset();
				break;
			}
			if reader.read_u8().ok()? != NeoConstants::PUBLIC_KEY_SIZE_COMPRESSED as u8 {
				return None;
			}
			let encoded = reader.read_bytes(NeoConstants::PUBLIC_KEY_SIZE_COMPRESSED).ok()?;
			keys.push(Secp256r1PublicKey::from_bytes(&encoded).ok()?);
		}
		let n = u32::try_from(reader.read_push_int().ok()?).ok()?;
		if n as usize != keys.len() || threshold < 1 || threshold > n {
			return None;
		}
		if reader.read_u8().ok()? != OpCode::Syscall.opcode() {
			return None;
		}
		let hash = reader.read_bytes(4).ok()?;
		if hash != InteropService::SystemCryptoCheckMultiSig.hash() {
			return None;
		}
		Some((threshold, keys))
	}

	/// Public keys committed to by this script, sorted as emitted.
	pub fn get_public_keys(&self) -> Result<Vec<Secp256r1PublicKey>, CryptoError> {
		if self.is_single_sig() {
			let key = Secp256r1PublicKey::from_bytes(&self.script[2..35])?;
			return Ok(vec![key]);
		}
		self.parse_multi_sig()
			.map(|(_, keys)| keys)
			.ok_or_else(|| CryptoError::InvalidKey("not a verification script".to_string()))
	}

	/// Number of signatures the script demands.
	pub fn get_signing_threshold(&self) -> Result<u32, TypeError> {
		if self.is_single_sig() {
			return Ok(1);
		}
		self.parse_multi_sig()
			.map(|(threshold, _)| threshold)
			.ok_or_else(|| TypeError::InvalidArgument("not a verification script".to_string()))
	}

	/// Number of participating keys.
	pub fn get_nr_of_accounts(&self) -> Result<u32, TypeError> {
		if self.is_single_sig() {
			return Ok(1);
		}
		self.parse_multi_sig()
			.map(|(_, keys)| keys.len() as u32)
			.ok_or_else(|| TypeError::InvalidArgument("not a verification script".to_string()))
	}
}

impl NeoSerializable for VerificationScript {
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
