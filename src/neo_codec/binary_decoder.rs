use num_bigint::BigInt;

use crate::neo_codec::{CodecError, NeoSerializable};
use crate::neo_types::OpCode;

/// A binary reader over a byte slice. All multi-byte integers are read
/// little-endian; exhausting the slice yields [`CodecError::UnexpectedEof`].
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
	data: &'a [u8],
	pointer: usize,
	marker: usize,
}

impl<'a> Decoder<'a> {
	pub fn new(data: &'a [u8]) -> Self {
		Self { data, pointer: 0, marker: 0 }
	}

	/// Number of unread bytes.
	pub fn available(&self) -> usize {
		self.data.len() - self.pointer
	}

	/// Current read offset.
	pub fn pointer(&self) -> usize {
		self.pointer
	}

	/// Remembers the current offset for a later [`Decoder::reset`].
	pub fn mark(&mut self) {
		self.marker = self.pointer;
	}

	/// Rewinds to the last [`Decoder::mark`].
	pub fn reset(&mut self) {
		self.pointer = self.marker;
	}

	pub fn read_u8(&mut self) -> Result<u8, CodecError> {
		let byte = *self.data.get(self.pointer).ok_or(CodecError::UnexpectedEof)?;
		self.pointer += 1;
		Ok(byte)
	}

	pub fn read_bool(&mut self) -> Result<bool, CodecError> {
		Ok(self.read_u8()? == 1)
	}

	pub fn read_u16(&mut self) -> Result<u16, CodecError> {
		Ok(u16::from_le_bytes(self.read_array()?))
	}

	pub fn read_i16(&mut self) -> Result<i16, CodecError> {
		Ok(i16::from_le_bytes(self.read_array()?))
	}

	pub fn read_u32(&mut self) -> Result<u32, CodecError> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	pub fn read_i32(&mut self) -> Result<i32, CodecError> {
		Ok(i32::from_le_bytes(self.read_array()?))
	}

	pub fn read_u64(&mut self) -> Result<u64, CodecError> {
		Ok(u64::from_le_bytes(self.read_array()?))
	}

	pub fn read_i64(&mut self) -> Result<i64, CodecError> {
		Ok(i64::from_le_bytes(self.read_array()?))
	}

	fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
		let bytes = self.read_bytes(N)?;
		let mut out = [0u8; N];
		out.copy_from_slice(&bytes);
		Ok(out)
	}

	pub fn read_bytes(&mut self, length: usize) -> Result<Vec<u8>, CodecError> {
		if self.pointer + length > self.data.len() {
			return Err(CodecError::UnexpectedEof);
		}
		let result = self.data[self.pointer..self.pointer + length].to_vec();
		self.pointer += length;
		Ok(result)
	}

	/// Reads a Neo var-int (see [`Encoder::write_var_int`](crate::neo_codec::Encoder::write_var_int)).
	pub fn read_var_int(&mut self) -> Result<u64, CodecError> {
		let first = self.read_u8()?;
		match first {
			0xFD => Ok(self.read_u16()? as u64),
			0xFE => Ok(self.read_u32()? as u64),
			0xFF => self.read_u64(),
			_ => Ok(first as u64),
		}
	}

	pub fn read_var_bytes(&mut self) -> Result<Vec<u8>, CodecError> {
		let len = self.read_var_int()?;
		if len > self.available() as u64 {
			return Err(CodecError::InvalidLength(format!(
				"var-bytes length {len} exceeds remaining {}",
				self.available()
			)));
		}
		self.read_bytes(len as usize)
	}

	/// Reads var-bytes and validates them as UTF-8.
	pub fn read_var_string(&mut self) -> Result<String, CodecError> {
		let bytes = self.read_var_bytes()?;
		String::from_utf8(bytes).map_err(|e| CodecError::InvalidData(e.to_string()))
	}

	/// Reads a compressed EC point: prefix 0x02/0x03 followed by 32 bytes.
	pub fn read_encoded_ec_point(&mut self) -> Result<Vec<u8>, CodecError> {
		let prefix = self.read_u8()?;
		match prefix {
			0x02 | 0x03 => {
				let mut point = vec![prefix];
				point.extend(self.read_bytes(32)?);
				Ok(point)
			},
			_ => Err(CodecError::InvalidData(format!("invalid EC point prefix 0x{prefix:02x}"))),
		}
	}

	/// Reads one PUSHDATA-prefixed byte string from a script.
	pub fn read_push_bytes(&mut self) -> Result<Vec<u8>, CodecError> {
		let opcode = self.read_u8()?;
		let len = match OpCode::from_byte(opcode) {
			Some(OpCode::PushData1) => self.read_u8()? as usize,
			Some(OpCode::PushData2) => self.read_u16()? as usize,
			Some(OpCode::PushData4) => self.read_u32()? as usize,
			// Raw short form: the opcode byte is the length itself.
			_ if (0x01..=0x4B).contains(&opcode) => opcode as usize,
			_ => {
				return Err(CodecError::InvalidDiscriminant(format!(
					"opcode 0x{opcode:02x} does not push data"
				)))
			},
		};
		self.read_bytes(len)
	}

	/// Reads one pushed integer from a script and returns its value.
	pub fn read_push_int(&mut self) -> Result<BigInt, CodecError> {
		let opcode = self.read_u8()?;
		if opcode == OpCode::PushM1.opcode() {
			return Ok(BigInt::from(-1));
		}
		if (OpCode::Push0.opcode()..=OpCode::Push16.opcode()).contains(&opcode) {
			return Ok(BigInt::from(opcode - OpCode::Push0.opcode()));
		}
		let count = match OpCode::from_byte(opcode) {
			Some(OpCode::PushInt8) => 1,
			Some(OpCode::PushInt16) => 2,
			Some(OpCode::PushInt32) => 4,
			Some(OpCode::PushInt64) => 8,
			Some(OpCode::PushInt128) => 16,
			Some(OpCode::PushInt256) => 32,
			_ => {
				return Err(CodecError::InvalidDiscriminant(format!(
					"opcode 0x{opcode:02x} does not push an integer"
				)))
			},
		};
		let bytes = self.read_bytes(count)?;
		Ok(BigInt::from_signed_bytes_le(&bytes))
	}

	/// Reads a pushed UTF-8 string.
	pub fn read_push_string(&mut self) -> Result<String, CodecError> {
		let bytes = self.read_push_bytes()?;
		String::from_utf8(bytes).map_err(|e| CodecError::InvalidData(e.to_string()))
	}

	pub fn read_serializable<T: NeoSerializable>(&mut self) -> Result<T, T::Error> {
		T::decode(self)
	}

	/// Reads a var-int count followed by that many serializable values.
	pub fn read_serializable_list<T: NeoSerializable>(&mut self) -> Result<Vec<T>, T::Error> {
		let len = self.read_var_int()?;
		if len > self.available() as u64 {
			return Err(CodecError::InvalidLength(format!("list count {len} exceeds input")).into());
		}
		let mut list = Vec::with_capacity(len as usize);
		for _ in 0..len {
			list.push(T::decode(self)?);
		}
		Ok(list)
	}
}
