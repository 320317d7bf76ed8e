//! Emission of Neo VM scripts.
//!
//! Push emission follows the minimal-form rules: `-1` and `0..=16` use the
//! dedicated constant opcodes, other integers the narrowest `PUSHINT*`
//! fit, and byte strings up to 75 bytes the raw short form in which the
//! opcode byte is the length itself.

use getset::Getters;
use num_bigint::BigInt;
use num_traits::Signed;
use primitive_types::H160;

use crate::neo_builder::InteropService;
use crate::neo_codec::Encoder;
use crate::neo_types::{
	Bytes, ContractParameter, ContractParameterMap, ContractParameterType, OpCode, ParameterValue,
	ScriptHashExtension, TypeError,
};

/// A builder that accumulates Neo VM bytecode.
///
/// # Examples
///
/// ```rust,ignore
/// use neo3_core::neo_builder::ScriptBuilder;
/// use num_bigint::BigInt;
///
/// let mut builder = ScriptBuilder::new();
/// builder.push_integer(BigInt::from(42))?.push_data(b"hello".to_vec());
/// let script = builder.to_bytes();
/// ```
#[derive(Debug, Default, Getters)]
pub struct ScriptBuilder {
	#[getset(get = "pub")]
	script: Encoder,
}

impl ScriptBuilder {
	pub fn new() -> Self {
		Self { script: Encoder::new() }
	}

	/// Appends opcodes without operands.
	pub fn op_code(&mut self, op_codes: &[OpCode]) -> &mut Self {
		for op in op_codes {
			self.script.write_u8(op.opcode());
		}
		self
	}

	/// Appends one opcode followed by its raw operand bytes.
	pub fn op_code_with_arg(&mut self, op_code: OpCode, argument: Bytes) -> &mut Self {
		self.script.write_u8(op_code.opcode());
		self.script.write_bytes(&argument);
		self
	}

	/// Emits `SYSCALL` with the service's 4-byte hash.
	pub fn sys_call(&mut self, service: InteropService) -> &mut Self {
		self.op_code_with_arg(OpCode::Syscall, service.hash().to_vec())
	}

	/// Pushes an integer in its minimal form.
	pub fn push_integer(&mut self, value: BigInt) -> Result<&mut Self, TypeError> {
		if value >= BigInt::from(-1) && value <= BigInt::from(16) {
			let offset: i8 = (&value).try_into().expect("checked range");
			let op = if offset < 0 {
				OpCode::PushM1
			} else {
				OpCode::from_byte(OpCode::Push0.opcode() + offset as u8).expect("push range")
			};
			return Ok(self.op_code(&[op]));
		}

		let bytes = value.to_signed_bytes_le();
		let negative = value.is_negative();
		match bytes.len() {
			1 => self.op_code_with_arg(OpCode::PushInt8, bytes),
			2 => self.op_code_with_arg(OpCode::PushInt16, bytes),
			len if len <= 4 => {
				self.op_code_with_arg(OpCode::PushInt32, Self::pad_right(&bytes, 4, negative))
			},
			len if len <= 8 => {
				self.op_code_with_arg(OpCode::PushInt64, Self::pad_right(&bytes, 8, negative))
			},
			len if len <= 16 => {
				self.op_code_with_arg(OpCode::PushInt128, Self::pad_right(&bytes, 16, negative))
			},
			len if len <= 32 => {
				self.op_code_with_arg(OpCode::PushInt256, Self::pad_right(&bytes, 32, negative))
			},
			_ => {
				return Err(TypeError::InvalidArgument(
					"integer exceeds 256 bits".to_string(),
				))
			},
		};
		Ok(self)
	}

	// Sign-extends a little-endian encoding to the target width.
	fn pad_right(bytes: &[u8], size: usize, negative: bool) -> Vec<u8> {
		let mut padded = vec![if negative { 0xFF } else { 0x00 }; size];
		padded[..bytes.len()].copy_from_slice(bytes);
		padded
	}

	/// Pushes a byte string, choosing between the raw short form (up to
	/// 75 bytes) and the `PUSHDATA` variants.
	pub fn push_data(&mut self, data: Bytes) -> &mut Self {
		match data.len() {
			0..=75 => {
				self.script.write_u8(data.len() as u8);
				self.script.write_bytes(&data);
			},
			76..=0xFF => {
				self.op_code(&[OpCode::PushData1]);
				self.script.write_u8(data.len() as u8);
				self.script.write_bytes(&data);
			},
			0x100..=0xFFFF => {
				self.op_code(&[OpCode::PushData2]);
				self.script.write_u16(data.len() as u16);
				self.script.write_bytes(&data);
			},
			_ => {
				self.op_code(&[OpCode::PushData4]);
				self.script.write_u32(data.len() as u32);
				self.script.write_bytes(&data);
			},
		}
		self
	}

	/// Pushes a UTF-8 string as its byte encoding.
	pub fn push_string(&mut self, value: &str) -> &mut Self {
		self.push_data(value.as_bytes().to_vec())
	}

	pub fn push_bool(&mut self, value: bool) -> &mut Self {
		self.op_code(&[if value { OpCode::PushTrue } else { OpCode::PushFalse }])
	}

	pub fn push_null(&mut self) -> &mut Self {
		self.op_code(&[OpCode::PushNull])
	}

	/// Pushes one contract parameter, dispatching on its tag.
	pub fn push_param(&mut self, param: &ContractParameter) -> Result<&mut Self, TypeError> {
		if param.get_type() == ContractParameterType::Any {
			return Ok(self.push_null());
		}
		match param.value.as_ref().ok_or_else(|| {
			TypeError::InvalidArgument(format!("{} parameter without value", param.get_type().as_str()))
		})? {
			ParameterValue::Boolean(b) => self.push_bool(*b),
			ParameterValue::Integer(i) => self.push_integer(BigInt::from(*i))?,
			ParameterValue::ByteArray(b)
			| ParameterValue::Signature(b)
			| ParameterValue::PublicKey(b) => self.push_data(b.clone()),
			ParameterValue::String(s) => self.push_string(s),
			ParameterValue::H160(h) => self.push_data(h.to_le_vec()),
			ParameterValue::H256(h) => {
				let mut bytes = h.as_bytes().to_vec();
				bytes.reverse();
				self.push_data(bytes)
			},
			ParameterValue::Array(values) => self.push_array(values)?,
			ParameterValue::Map(map) => self.push_map(map)?,
		};
		Ok(self)
	}

	/// Pushes an array parameter: elements in reverse order, then the
	/// count and `PACK`, leaving the first element on top.
	pub fn push_array(&mut self, values: &[ContractParameter]) -> Result<&mut Self, TypeError> {
		for value in values.iter().rev() {
			self.push_param(value)?;
		}
		self.push_integer(BigInt::from(values.len()))?;
		Ok(self.op_code(&[OpCode::Pack]))
	}

	/// Pushes a map parameter: value then key per entry, then the entry
	/// count and `PACKMAP`.
	pub fn push_map(&mut self, map: &ContractParameterMap) -> Result<&mut Self, TypeError> {
		for (key, value) in map.iter() {
			self.push_param(value)?;
			self.push_param(key)?;
		}
		self.push_integer(BigInt::from(map.len()))?;
		Ok(self.op_code(&[OpCode::PackMap]))
	}

	/// Emits a full contract call: packed arguments, method name, the
	/// contract hash in little-endian bytes, then
	/// `SYSCALL System.Contract.Call`.
	pub fn contract_call(
		&mut self,
		contract: &H160,
		method: &str,
		params: &[ContractParameter],
	) -> Result<&mut Self, TypeError> {
		self.push_array(params)?;
		self.push_string(method);
		self.push_data(contract.to_le_vec());
		Ok(self.sys_call(InteropService::SystemContractCall))
	}

	/// Current script length in bytes.
	pub fn len(&self) -> usize {
		self.script.size()
	}

	pub fn is_empty(&self) -> bool {
		self.script.size() == 0
	}

	pub fn to_bytes(&self) -> Bytes {
		self.script.to_bytes()
	}
}
