//! Primitive value types shared across the SDK: hashes, addresses,
//! contract parameters, stack items and the VM opcode table.

pub use address::{
	address_to_script_hash, is_valid_address, public_key_to_address, public_key_to_script_hash,
	script_hash_to_address, Address,
};
pub use contract_parameter::{
	ContractParameter, ContractParameterMap, ContractParameterType, ParameterValue,
};
pub use error::TypeError;
pub use nef_file::NefFile;
pub use op_code::OpCode;
pub use script_hash::{Hash256, Hash256Extension, ScriptHash, ScriptHashExtension};
pub use serde_helpers::{
	base64_decode, deserialize_base64, deserialize_h160, deserialize_h256, serialize_base64,
	serialize_h160, serialize_h256, Base64Encode,
};
pub use stack_item::{MapEntry, StackItem};
pub use vm_state::VMState;

/// An owned byte string.
pub type Bytes = Vec<u8>;

mod address;
mod contract_parameter;
mod error;
mod nef_file;
mod op_code;
mod script_hash;
pub(crate) mod serde_helpers;
mod stack_item;
mod vm_state;
