/// Protocol-level constants shared by the codec, builder and wallet layers.
#[derive(Debug, Clone, Copy)]
pub struct NeoConstants;

impl NeoConstants {
	// Accounts, addresses, keys

	/// Maximum number of public keys that can take part in a multi-sig account.
	pub const MAX_PUBLIC_KEYS_PER_MULTI_SIG_ACCOUNT: u32 = 1024;

	/// Byte size of a `Hash160`.
	pub const HASH160_SIZE: usize = 20;

	/// Byte size of a `Hash256`.
	pub const HASH256_SIZE: usize = 32;

	/// Byte size of a private key.
	pub const PRIVATE_KEY_SIZE: usize = 32;

	/// Byte size of a compressed public key.
	pub const PUBLIC_KEY_SIZE_COMPRESSED: usize = 33;

	/// Byte size of a compact ECDSA signature.
	pub const SIGNATURE_SIZE: usize = 64;

	/// Byte size of a single-signature verification script.
	pub const VERIFICATION_SCRIPT_SIZE: usize = 40;

	/// Version byte of a Neo N3 address.
	pub const ADDRESS_VERSION: u8 = 0x35;

	// Transactions

	/// The transaction version emitted by this library.
	pub const CURRENT_TX_VERSION: u8 = 0;

	/// Maximum serialized size of a transaction in bytes.
	pub const MAX_TRANSACTION_SIZE: usize = 102_400;

	/// Maximum number of attributes a transaction can carry.
	pub const MAX_TRANSACTION_ATTRIBUTES: usize = 16;

	/// Maximum number of contracts, groups or rules per signer scope.
	pub const MAX_SIGNER_SUBITEMS: usize = 16;

	/// Transaction lifetime window in milliseconds.
	pub const MAX_VALID_UNTIL_BLOCK_INCREMENT_MS: u32 = 86_400_000;

	/// Milliseconds per block assumed when converting the lifetime window
	/// into a block count.
	pub const MS_PER_BLOCK: u32 = 15_000;

	/// Transaction lifetime window in blocks.
	pub const MAX_VALID_UNTIL_BLOCK_INCREMENT: u32 =
		Self::MAX_VALID_UNTIL_BLOCK_INCREMENT_MS / Self::MS_PER_BLOCK;

	/// Default maximum number of items fetched per iterator page.
	pub const MAX_ITERATOR_ITEMS_DEFAULT: u32 = 100;

	// NEP-2 scrypt parameters

	/// scrypt log2(N).
	pub const SCRYPT_LOG_N: u8 = 14;
	/// scrypt block size.
	pub const SCRYPT_R: u32 = 8;
	/// scrypt parallelism.
	pub const SCRYPT_P: u32 = 8;
	/// scrypt derived key length.
	pub const SCRYPT_DK_LEN: usize = 64;
	/// Upper bound on the scrypt cost parameter accepted from wallet files.
	pub const SCRYPT_MAX_N: u64 = 1 << 20;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn valid_until_block_window_is_one_day_of_blocks() {
		assert_eq!(NeoConstants::MAX_VALID_UNTIL_BLOCK_INCREMENT, 5760);
	}
}
