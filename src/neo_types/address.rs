//! Neo N3 address encoding.
//!
//! An address is `base58check(0x35 ∥ script_hash)` with the script hash in
//! its big-endian form; the checksum is the first four bytes of the double
//! SHA-256 of the 21-byte prefix. Every Neo N3 address renders as a
//! 34-character string starting with `N`.

use primitive_types::H160;

use crate::neo_config::NeoConstants;
use crate::neo_crypto::{base58check_decode, base58check_encode, Secp256r1PublicKey};
use crate::neo_types::TypeError;

/// A Neo N3 address string.
pub type Address = String;

/// Encodes a script hash as an address.
pub fn script_hash_to_address(script_hash: &H160) -> Address {
	let mut data = Vec::with_capacity(1 + NeoConstants::HASH160_SIZE);
	data.push(NeoConstants::ADDRESS_VERSION);
	data.extend_from_slice(script_hash.as_bytes());
	base58check_encode(&data)
}

/// Decodes an address back to its script hash.
pub fn address_to_script_hash(address: &str) -> Result<H160, TypeError> {
	let data = base58check_decode(address)
		.map_err(|e| TypeError::InvalidAddress(format!("{address}: {e}")))?;
	if data.len() != 1 + NeoConstants::HASH160_SIZE {
		return Err(TypeError::InvalidAddress(format!(
			"decoded to {} bytes, expected {}",
			data.len(),
			1 + NeoConstants::HASH160_SIZE
		)));
	}
	if data[0] != NeoConstants::ADDRESS_VERSION {
		return Err(TypeError::InvalidAddress(format!("version byte 0x{:02x}", data[0])));
	}
	Ok(H160::from_slice(&data[1..]))
}

/// The address of a single-sig account for a public key.
pub fn public_key_to_address(public_key: &Secp256r1PublicKey) -> Address {
	let script_hash = public_key_to_script_hash(public_key);
	script_hash_to_address(&script_hash)
}

/// The script hash of a single-sig account for a public key.
pub fn public_key_to_script_hash(public_key: &Secp256r1PublicKey) -> H160 {
	let script = crate::neo_builder::VerificationScript::from_public_key(public_key);
	script.hash()
}

/// Checks version byte, length and checksum without producing a hash.
pub fn is_valid_address(address: &str) -> bool {
	address_to_script_hash(address).is_ok()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::neo_types::ScriptHashExtension;

	#[test]
	fn address_round_trip() {
		let hash = H160::from_hex("23ba2703c53263e8d6e522dc32203339dcd8eee9").unwrap();
		let address = script_hash_to_address(&hash);
		assert!(address.starts_with('N'));
		assert_eq!(address.len(), 34);
		assert_eq!(address_to_script_hash(&address).unwrap(), hash);
		assert!(is_valid_address(&address));
	}

	#[test]
	fn rejects_tampered_address() {
		let hash = H160::from_hex("23ba2703c53263e8d6e522dc32203339dcd8eee9").unwrap();
		let mut address = script_hash_to_address(&hash);
		// Flip the final character to break the checksum.
		let last = address.pop().unwrap();
		address.push(if last == '1' { '2' } else { '1' });
		assert!(!is_valid_address(&address));
	}

	#[test]
	fn rejects_garbage() {
		assert!(!is_valid_address(""));
		assert!(!is_valid_address("not-an-address"));
		assert!(!is_valid_address("0x23ba2703c53263e8d6e522dc32203339dcd8eee9"));
	}
}
