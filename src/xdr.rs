use std::io::{self, Write};

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use crate::error::TransportError;

pub struct Packer{
	pub buff:Vec<u8>
}

/// Reads XDR items from the front of a reply.  Consumed bytes are tracked with a cursor
/// instead of being removed so large waveform replies aren't shifted byte by byte.
pub struct Unpacker {
	buff:Vec<u8>,
	pos:usize,
}

type XdrResult<T> = Result<T, TransportError>;

fn padding(n:usize) -> usize { (4 - n % 4) % 4 }

impl Packer {

	pub fn new() -> Self { Packer{buff: Vec::new()} }

	pub fn reset(&mut self) { self.buff.clear(); }

	pub fn get_buf(&self) -> &[u8] { &self.buff }

	// Packing methods that can only add multiples of four bytes, so if we started off with the correct
	// padding, we'll end up with the correct padding
	pub fn pack_u32(&mut self, x:u32) -> io::Result<()> { self.buff.write_u32::<BigEndian>(x) }
	pub fn pack_i32(&mut self, x:i32) -> io::Result<()> { self.buff.write_i32::<BigEndian>(x) }

	pub fn pack_bool(&mut self, b:bool) -> io::Result<()> { self.pack_i32(if b { 1 } else { 0 }) }

	pub fn pack_enum(&mut self, x:i32) -> io::Result<()> { self.pack_i32(x) }

	// Packing methods that require padding at the end
	pub fn pack_variable_len_opaque(&mut self, data:&[u8]) -> io::Result<()> {
		self.pack_u32(data.len() as u32)?;
		self.buff.write_all(data)?;
		self.buff.extend(std::iter::repeat(0).take(padding(data.len())));
		Ok(())
	}

}

impl Default for Packer {
	fn default() -> Self { Self::new() }
}

impl Unpacker {

	pub fn new() -> Self { Unpacker{buff: Vec::new(), pos: 0} }

	pub fn reset(&mut self, data:&[u8]) {
		self.buff.clear();
		self.buff.extend_from_slice(data);
		self.pos = 0;
	}

	pub fn remaining(&self) -> usize { self.buff.len() - self.pos }
	pub fn all_data_consumed(&self) -> bool { self.remaining() == 0 }

	fn take(&mut self, n:usize) -> XdrResult<&[u8]> {
		if n > self.remaining() {
			return Err(TransportError::Xdr("Tried to read past the end of the buffer"));
		}
		let start = self.pos;
		self.pos += n;
		Ok(&self.buff[start..self.pos])
	}

	pub fn unpack_u32(&mut self) -> XdrResult<u32> { self.take(4).map(BigEndian::read_u32) }
	pub fn unpack_i32(&mut self) -> XdrResult<i32> { self.take(4).map(BigEndian::read_i32) }

	// An enum is just an i32 with a restricted set of values.  We can't check that this value is in the restricted set at this
	// level because it depends on the application, so for our purposes here, an enum is the same as an i32
	pub fn unpack_enum(&mut self) -> XdrResult<i32> { self.unpack_i32() }

	pub fn unpack_bool(&mut self) -> XdrResult<bool> {
		match self.unpack_i32()? {
			0 => Ok(false),
			1 => Ok(true),
			_ => Err(TransportError::Xdr("Expected 0 or 1 for a boolean")),
		}
	}

	pub fn unpack_variable_len_opaque(&mut self) -> XdrResult<Vec<u8>> {
		let n = self.unpack_u32()? as usize;
		let ans:Vec<u8> = self.take(n)?.to_vec();
		self.take(padding(n))?;
		Ok(ans)
	}

}

impl Default for Unpacker {
	fn default() -> Self { Self::new() }
}
