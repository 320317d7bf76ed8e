use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// The hash compositions Neo uses: plain SHA-256, double SHA-256
/// (`HASH256`) and RIPEMD-160 over SHA-256 (`HASH160`).
pub trait HashableForVec {
	/// `SHA256(self)`.
	fn sha256(&self) -> Vec<u8>;

	/// `SHA256(SHA256(self))`.
	fn hash256(&self) -> Vec<u8>;

	/// `RIPEMD160(self)`.
	fn ripemd160(&self) -> Vec<u8>;

	/// `RIPEMD160(SHA256(self))`.
	fn sha256_ripemd160(&self) -> Vec<u8>;
}

impl HashableForVec for [u8] {
	fn sha256(&self) -> Vec<u8> {
		let mut hasher = Sha256::new();
		hasher.update(self);
		hasher.finalize().to_vec()
	}

	fn hash256(&self) -> Vec<u8> {
		self.sha256().sha256()
	}

	fn ripemd160(&self) -> Vec<u8> {
		let mut hasher = Ripemd160::new();
		hasher.update(self);
		hasher.finalize().to_vec()
	}

	fn sha256_ripemd160(&self) -> Vec<u8> {
		let mut hasher = Ripemd160::new();
		hasher.update(self.sha256());
		hasher.finalize().to_vec()
	}
}

impl HashableForVec for Vec<u8> {
	fn sha256(&self) -> Vec<u8> {
		self.as_slice().sha256()
	}

	fn hash256(&self) -> Vec<u8> {
		self.as_slice().hash256()
	}

	fn ripemd160(&self) -> Vec<u8> {
		self.as_slice().ripemd160()
	}

	fn sha256_ripemd160(&self) -> Vec<u8> {
		self.as_slice().sha256_ripemd160()
	}
}
