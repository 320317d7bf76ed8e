use crate::neo_crypto::HashableForVec;

/// Interop services reachable through `SYSCALL`. The wire form of a
/// syscall is the first four bytes of the SHA-256 of the ASCII name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteropService {
	SystemContractCall,
	SystemCryptoCheckSig,
	SystemCryptoCheckMultiSig,
}

impl InteropService {
	/// ASCII name of the service.
	pub fn name(&self) -> &'static str {
		match self {
			InteropService::SystemContractCall => "System.Contract.Call",
			InteropService::SystemCryptoCheckSig => "System.Crypto.CheckSig",
			InteropService::SystemCryptoCheckMultiSig => "System.Crypto.CheckMultisig",
		}
	}

	/// The 4-byte syscall hash.
	pub fn hash(&self) -> [u8; 4] {
		let digest = self.name().as_bytes().sha256();
		let mut hash = [0u8; 4];
		hash.copy_from_slice(&digest[..4]);
		hash
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hash_is_prefix_of_name_digest() {
		for service in [
			InteropService::SystemContractCall,
			InteropService::SystemCryptoCheckSig,
			InteropService::SystemCryptoCheckMultiSig,
		] {
			let digest = service.name().as_bytes().sha256();
			assert_eq!(service.hash(), digest[..4]);
		}
	}

	#[test]
	fn distinct_services_have_distinct_hashes() {
		assert_ne!(
			InteropService::SystemCryptoCheckSig.hash(),
			InteropService::SystemCryptoCheckMultiSig.hash()
		);
	}
}
