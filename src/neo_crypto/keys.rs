//! secp256r1 key and signature types.
//!
//! [`Secp256r1PublicKey`] stores a validated curve point and renders it in
//! the 33-byte compressed SEC1 encoding; uncompressed 65-byte input is
//! accepted and normalized on ingestion. [`Secp256r1PrivateKey`] wraps a
//! scalar in `[1, n-1]` that is wiped when dropped. Signing hashes the
//! message with SHA-256 unless the prehash variant is used.

use core::fmt;
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use elliptic_curve::zeroize::Zeroize;
use ecdsa::RecoveryId;
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use signature::hazmat::{PrehashSigner, PrehashVerifier};
use signature::{Signer, Verifier};
use p256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use p256::{EncodedPoint, FieldBytes, PublicKey, SecretKey};
use rand_core::OsRng;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::neo_crypto::CryptoError;

/// A point on secp256r1.
#[derive(Debug, Clone)]
pub struct Secp256r1PublicKey {
	inner: PublicKey,
}

/// A secp256r1 private scalar.
#[derive(Debug, Clone)]
pub struct Secp256r1PrivateKey {
	inner: SecretKey,
}

/// A compact `(r, s)` ECDSA signature.
#[derive(Clone)]
pub struct Secp256r1Signature {
	inner: Signature,
}

impl Secp256r1PublicKey {
	/// Builds a public key from affine coordinates. Returns `None` when the
	/// coordinates do not name a point on the curve.
	pub fn new(gx: [u8; 32], gy: [u8; 32]) -> Option<Self> {
		let point = EncodedPoint::from_affine_coordinates(&gx.into(), &gy.into(), false);
		let key = PublicKey::from_encoded_point(&point);
		if key.is_some().into() {
			Some(Self { inner: key.unwrap() })
		} else {
			None
		}
	}

	/// Parses a SEC1-encoded point, compressed (33 bytes) or uncompressed
	/// (65 bytes). The stored form is always compressed.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
		let point = EncodedPoint::from_bytes(bytes)
			.map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
		let key = PublicKey::from_encoded_point(&point);
		if key.is_some().into() {
			Ok(Self { inner: key.unwrap() })
		} else {
			Err(CryptoError::PointNotOnCurve)
		}
	}

	/// Parses a hex string, with or without a `0x` prefix.
	pub fn from_encoded(encoded: &str) -> Result<Self, CryptoError> {
		let bytes = hex::decode(encoded.trim_start_matches("0x"))?;
		Self::from_bytes(&bytes)
	}

	/// SEC1 encoding, compressed or uncompressed.
	pub fn get_encoded(&self, compressed: bool) -> Vec<u8> {
		self.inner.to_encoded_point(compressed).as_bytes().to_vec()
	}

	/// Compressed encoding as lowercase hex without a prefix.
	pub fn get_encoded_compressed_hex(&self) -> String {
		hex::encode(self.get_encoded(true))
	}

	/// Verifies a signature over `message` (hashed with SHA-256).
	pub fn verify(
		&self,
		message: &[u8],
		signature: &Secp256r1Signature,
	) -> Result<(), CryptoError> {
		VerifyingKey::from(&self.inner)
			.verify(message, &signature.inner)
			.map_err(|_| CryptoError::VerifyFailed)
	}

	/// Verifies a signature over a 32-byte digest.
	pub fn verify_hash(
		&self,
		digest: &[u8],
		signature: &Secp256r1Signature,
	) -> Result<(), CryptoError> {
		VerifyingKey::from(&self.inner)
			.verify_prehash(digest, &signature.inner)
			.map_err(|_| CryptoError::VerifyFailed)
	}
}

impl Secp256r1PrivateKey {
	/// Generates a fresh key from the given cryptographic RNG.
	pub fn random(rng: &mut OsRng) -> Self {
		Self { inner: SecretKey::random(rng) }
	}

	/// Builds from 32 big-endian bytes, rejecting zero and values at or
	/// beyond the group order.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
		if bytes.len() != 32 {
			return Err(CryptoError::InvalidKey(format!(
				"private key must be 32 bytes, got {}",
				bytes.len()
			)));
		}
		SecretKey::from_slice(bytes)
			.map(|inner| Self { inner })
			.map_err(|_| CryptoError::InvalidKey("scalar out of range".to_string()))
	}

	/// The 32-byte big-endian scalar.
	pub fn to_raw_bytes(&self) -> [u8; 32] {
		let bytes = self.inner.to_bytes();
		let mut out = [0u8; 32];
		out.copy_from_slice(bytes.as_slice());
		out
	}

	/// Derives the public key `d·G`.
	pub fn to_public_key(&self) -> Secp256r1PublicKey {
		Secp256r1PublicKey { inner: self.inner.public_key() }
	}

	/// Overwrites the scalar with a fixed value ahead of drop.
	pub fn erase(&mut self) {
		let mut bytes = self.inner.to_bytes();
		bytes.zeroize();
		// A zero scalar is not a valid key, use 1 as the neutral filler.
		let mut filler = [0u8; 32];
		filler[31] = 1;
		self.inner = SecretKey::from_slice(&filler)
			.expect("one is a valid scalar");
	}

	/// Signs `SHA256(message)`.
	pub fn sign_tx(&self, message: &[u8]) -> Result<Secp256r1Signature, CryptoError> {
		let signing_key = SigningKey::from(&self.inner);
		let signature: Signature =
			signing_key.try_sign(message).map_err(|_| CryptoError::SignFailed)?;
		Ok(Secp256r1Signature { inner: signature })
	}

	/// Signs a caller-provided 32-byte digest.
	pub fn sign_prehash(&self, digest: &[u8]) -> Result<Secp256r1Signature, CryptoError> {
		let signing_key = SigningKey::from(&self.inner);
		let signature: Signature =
			signing_key.sign_prehash(digest).map_err(|_| CryptoError::SignFailed)?;
		Ok(Secp256r1Signature { inner: signature })
	}
}

impl Secp256r1Signature {
	/// Builds from 32-byte `r` and `s` scalars.
	pub fn from_scalars(r: [u8; 32], s: [u8; 32]) -> Result<Self, CryptoError> {
		let r: FieldBytes = r.into();
		let s: FieldBytes = s.into();
		Signature::from_scalars(r, s)
			.map(|inner| Self { inner })
			.map_err(|_| CryptoError::InvalidKey("invalid signature scalars".to_string()))
	}

	/// Parses the 64-byte compact form, `r` then `s`.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
		if bytes.len() != 64 {
			return Err(CryptoError::InvalidKey(format!(
				"signature must be 64 bytes, got {}",
				bytes.len()
			)));
		}
		Signature::from_slice(bytes)
			.map(|inner| Self { inner })
			.map_err(|_| CryptoError::InvalidKey("invalid signature encoding".to_string()))
	}

	/// The 64-byte compact form, `r` then `s`.
	pub fn to_bytes(&self) -> [u8; 64] {
		let mut bytes = [0u8; 64];
		bytes.copy_from_slice(&self.inner.to_bytes());
		bytes
	}

	/// DER encoding.
	pub fn to_der(&self) -> Vec<u8> {
		self.inner.to_der().as_bytes().to_vec()
	}

	/// Parses a DER encoding into compact form.
	pub fn from_der(bytes: &[u8]) -> Result<Self, CryptoError> {
		Signature::from_der(bytes)
			.map(|inner| Self { inner })
			.map_err(|_| CryptoError::InvalidKey("invalid DER signature".to_string()))
	}

	/// True when `s ≤ n/2`.
	pub fn is_canonical(&self) -> bool {
		self.inner.normalize_s().is_none()
	}

	/// Returns the equivalent signature with `s ≤ n/2`.
	pub fn make_canonical(&self) -> Self {
		match self.inner.normalize_s() {
			Some(normalized) => Self { inner: normalized },
			None => self.clone(),
		}
	}
}

/// Reconstructs the public key that produced `signature` over `digest`,
/// selected by `recovery_id` (0..=3). Used only by offline utilities.
pub fn recover_public_key(
	recovery_id: u8,
	signature: &Secp256r1Signature,
	digest: &[u8],
) -> Result<Secp256r1PublicKey, CryptoError> {
	let id = RecoveryId::from_byte(recovery_id)
		.ok_or_else(|| CryptoError::InvalidKey(format!("recovery id {recovery_id}")))?;
	let key = VerifyingKey::recover_from_prehash(digest, &signature.inner, id)
		.map_err(|_| CryptoError::PointNotOnCurve)?;
	Ok(Secp256r1PublicKey { inner: key.into() })
}

impl fmt::Debug for Secp256r1Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Secp256r1Signature({})", hex::encode(self.to_bytes()))
	}
}

impl fmt::Display for Secp256r1PublicKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.get_encoded_compressed_hex())
	}
}

impl Serialize for Secp256r1PublicKey {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.get_encoded_compressed_hex())
	}
}

impl<'de> Deserialize<'de> for Secp256r1PublicKey {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let value = String::deserialize(deserializer)?;
		Secp256r1PublicKey::from_encoded(&value).map_err(D::Error::custom)
	}
}

impl PartialEq for Secp256r1PublicKey {
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl Eq for Secp256r1PublicKey {}

impl PartialOrd for Secp256r1PublicKey {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Secp256r1PublicKey {
	fn cmp(&self, other: &Self) -> Ordering {
		self.get_encoded(true).cmp(&other.get_encoded(true))
	}
}

impl Hash for Secp256r1PublicKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.get_encoded(true).hash(state);
	}
}

impl PartialEq for Secp256r1PrivateKey {
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl PartialEq for Secp256r1Signature {
	fn eq(&self, other: &Self) -> bool {
		self.to_bytes() == other.to_bytes()
	}
}

impl Eq for Secp256r1Signature {}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::neo_crypto::HashableForVec;

	const ENCODED_POINT: &str =
		"03b4af8d061b6b320cce6c63bc4ec7894dce107bfc5f5ef5c68a93b4ad1e136816";

	#[test]
	fn public_key_from_compressed_point() {
		let key = Secp256r1PublicKey::from_encoded(ENCODED_POINT).unwrap();
		assert_eq!(key.get_encoded_compressed_hex(), ENCODED_POINT);
		assert_eq!(key.get_encoded(true), hex::decode(ENCODED_POINT).unwrap());
	}

	#[test]
	fn public_key_from_uncompressed_point_normalizes() {
		let uncompressed = "04b4af8d061b6b320cce6c63bc4ec7894dce107bfc5f5ef5c68a93b4ad1e1368165f4f7fb1c5862465543c06dd5a2aa414f6583f92a5cc3e1d4259df79bf6839c9";
		let key = Secp256r1PublicKey::from_encoded(uncompressed).unwrap();
		assert_eq!(key.get_encoded_compressed_hex(), ENCODED_POINT);
	}

	#[test]
	fn public_key_with_wrong_size_is_rejected() {
		let truncated = &ENCODED_POINT[..ENCODED_POINT.len() - 2];
		assert!(Secp256r1PublicKey::from_encoded(truncated).is_err());
	}

	#[test]
	fn public_key_with_hex_prefix() {
		let prefixed = format!("0x{ENCODED_POINT}");
		let key = Secp256r1PublicKey::from_encoded(&prefixed).unwrap();
		assert_eq!(key.get_encoded_compressed_hex(), ENCODED_POINT);
	}

	#[test]
	fn public_keys_order_by_compressed_encoding() {
		let key1 = Secp256r1PublicKey::from_encoded(ENCODED_POINT).unwrap();
		let key2 = Secp256r1PublicKey::from_encoded(
			"036b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296",
		)
		.unwrap();
		assert!(key1 > key2);
	}

	#[test]
	fn private_key_rejects_zero_and_bad_length() {
		assert!(Secp256r1PrivateKey::from_bytes(&[0u8; 32]).is_err());
		assert!(Secp256r1PrivateKey::from_bytes(&[1u8; 31]).is_err());
	}

	#[test]
	fn sign_and_verify_round_trip() {
		let private_key = Secp256r1PrivateKey::from_bytes(
			&hex::decode("9117f4bf9be717c9a90994326897f4243503accd06712162267e77f18b49c3a3")
				.unwrap(),
		)
		.unwrap();
		let public_key = private_key.to_public_key();
		assert_eq!(
			public_key.get_encoded_compressed_hex(),
			"0265bf906bf385fbf3f777832e55a87991bcfbe19b097fb7c5ca2e4025a4d5e5d6"
		);

		let message = b"A test message";
		let signature = private_key.sign_tx(message).unwrap();
		assert!(public_key.verify(message, &signature).is_ok());
		assert!(public_key.verify(b"another message", &signature).is_err());

		// sign_tx hashes once; the prehash path verifies against that digest.
		let digest = message.as_slice().sha256();
		assert!(public_key.verify_hash(&digest, &signature).is_ok());
	}

	#[test]
	fn signature_compact_round_trip() {
		let private_key = Secp256r1PrivateKey::random(&mut OsRng);
		let signature = private_key.sign_tx(b"payload").unwrap();
		let restored = Secp256r1Signature::from_bytes(&signature.to_bytes()).unwrap();
		assert_eq!(restored, signature);

		let der = signature.to_der();
		assert_eq!(Secp256r1Signature::from_der(&der).unwrap(), signature);
	}

	#[test]
	fn canonical_signature_has_low_s() {
		let private_key = Secp256r1PrivateKey::random(&mut OsRng);
		for i in 0u32..8 {
			let signature = private_key.sign_tx(&i.to_le_bytes()).unwrap();
			let canonical = signature.make_canonical();
			assert!(canonical.is_canonical());
		}
	}

	#[test]
	fn erase_wipes_the_scalar() {
		let mut key = Secp256r1PrivateKey::from_bytes(
			&hex::decode("a7038726c5a127989d78593c423e3dad93b2d74db90a16c0a58468c9e6617a87")
				.unwrap(),
		)
		.unwrap();
		key.erase();
		let mut expected = [0u8; 32];
		expected[31] = 1;
		assert_eq!(key.to_raw_bytes(), expected);
	}

	#[test]
	fn recover_matches_signer() {
		let private_key = Secp256r1PrivateKey::random(&mut OsRng);
		let public_key = private_key.to_public_key();
		let digest = b"recoverable".as_slice().sha256();
		let signature = private_key.sign_prehash(&digest).unwrap();

		let recovered = (0u8..4).find_map(|id| {
			recover_public_key(id, &signature, &digest)
				.ok()
				.filter(|key| key == &public_key)
		});
		assert!(recovered.is_some());
	}
}
