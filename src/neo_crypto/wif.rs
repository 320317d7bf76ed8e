//! Wallet Import Format for private keys.
//!
//! A WIF string is `base58check(0x80 ∥ key32 ∥ 0x01)`; the trailing byte
//! marks the compressed public-key form Neo uses exclusively.

use crate::neo_crypto::{
	base58_decode, base58check_encode, CryptoError, HashableForVec, Secp256r1PrivateKey,
};

const WIF_VERSION: u8 = 0x80;
const COMPRESSION_FLAG: u8 = 0x01;

/// Encodes a private key as WIF.
pub fn wif_from_private_key(private_key: &Secp256r1PrivateKey) -> String {
	let mut data = Vec::with_capacity(34);
	data.push(WIF_VERSION);
	data.extend_from_slice(&private_key.to_raw_bytes());
	data.push(COMPRESSION_FLAG);
	base58check_encode(&data)
}

/// Decodes a WIF string, validating length, version byte, compression
/// flag and checksum.
pub fn private_key_from_wif(wif: &str) -> Result<Secp256r1PrivateKey, CryptoError> {
	let data = base58_decode(wif)?;
	if data.len() != 38 {
		return Err(CryptoError::InvalidKey(format!("WIF decodes to {} bytes, not 38", data.len())));
	}
	let (payload, checksum) = data.split_at(34);
	if &payload.hash256()[..4] != checksum {
		return Err(CryptoError::ChecksumMismatch);
	}
	if payload[0] != WIF_VERSION {
		return Err(CryptoError::InvalidKey(format!("WIF version byte 0x{:02x}", payload[0])));
	}
	if payload[33] != COMPRESSION_FLAG {
		return Err(CryptoError::InvalidKey("WIF missing compression flag".to_string()));
	}
	Secp256r1PrivateKey::from_bytes(&payload[1..33])
}

/// True when `wif` decodes to a well-formed compressed-key WIF.
pub fn is_valid_wif(wif: &str) -> bool {
	private_key_from_wif(wif).is_ok()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::neo_crypto::base58_encode;

	const WIF: &str = "KxDgvEKzgSBPPfuVfw67oPQBSjidEiqTHURKSDL1R7yGaGYAeYnr";
	const KEY_HEX: &str = "1dd37fba80fec4e6a6f13fd708d8dcb3b29def768017052f6c930fa1c5d90bbb";

	#[test]
	fn encode_known_vector() {
		let key = Secp256r1PrivateKey::from_bytes(&hex::decode(KEY_HEX).unwrap()).unwrap();
		assert_eq!(wif_from_private_key(&key), WIF);
	}

	#[test]
	fn decode_known_vector() {
		let key = private_key_from_wif(WIF).unwrap();
		assert_eq!(hex::encode(key.to_raw_bytes()), KEY_HEX);
	}

	#[test]
	fn more_known_vectors() {
		let vectors = [
			(
				"c983f3c6effa11a996b8def32f7ddca2a94c0c983b8a6025bb7a50f45e1cf647",
				"L3yRvfEowWQx7VvH5n45T54rkmbwKjSP728m913EdKQVUNMebQNv",
			),
			(
				"9117f0fe33bde89d70776e5e601704026db68e09ca456707093eb94e28c0b450",
				"L25kfnfjZiifZo8MZpwLsD4k73v3x4AjUP91tGVq3DKj33BZLBjs",
			),
		];
		for (key_hex, wif) in vectors {
			let key = Secp256r1PrivateKey::from_bytes(&hex::decode(key_hex).unwrap()).unwrap();
			assert_eq!(wif_from_private_key(&key), wif);
			assert_eq!(hex::encode(private_key_from_wif(wif).unwrap().to_raw_bytes()), key_hex);
			assert!(is_valid_wif(wif));
		}
	}

	#[test]
	fn rejects_malformed_strings() {
		assert!(!is_valid_wif(""));
		assert!(!is_valid_wif("InvalidWIF"));
		// Truncated.
		assert!(!is_valid_wif(&WIF[..WIF.len() - 1]));
	}

	#[test]
	fn rejects_bad_checksum() {
		let mut tampered = WIF.to_string();
		tampered.pop();
		tampered.push('Z');
		assert_eq!(private_key_from_wif(&tampered).unwrap_err(), CryptoError::ChecksumMismatch);
	}

	#[test]
	fn rejects_wrong_version_byte() {
		let mut data = base58_decode(WIF).unwrap();
		data.truncate(34);
		data[0] = 0x81;
		let reencoded = base58check_encode(&data);
		assert!(matches!(
			private_key_from_wif(&reencoded).unwrap_err(),
			CryptoError::InvalidKey(_)
		));
	}

	#[test]
	fn rejects_missing_compression_flag() {
		let mut data = base58_decode(WIF).unwrap();
		data.truncate(34);
		data[33] = 0x00;
		let reencoded = base58check_encode(&data);
		assert!(matches!(
			private_key_from_wif(&reencoded).unwrap_err(),
			CryptoError::InvalidKey(_)
		));
	}

	#[test]
	fn random_round_trip() {
		let key_pair = crate::neo_crypto::KeyPair::new_random();
		let wif = key_pair.export_as_wif();
		assert!(is_valid_wif(&wif));
		assert_eq!(
			private_key_from_wif(&wif).unwrap().to_raw_bytes(),
			key_pair.private_key_bytes()
		);
	}
}
