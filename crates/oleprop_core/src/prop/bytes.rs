use crate::prop::{PropError, Result};

/// Simple bounded cursor over an immutable little-endian byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(PropError::UnexpectedEof {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read a fixed-size array.
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
		let raw = self.read_exact(N)?;
		let mut out = [0_u8; N];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read one byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_array::<1>()?[0])
	}

	/// Read a little-endian `u16`.
	pub fn read_u16_le(&mut self) -> Result<u16> {
		Ok(u16::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `u32`.
	pub fn read_u32_le(&mut self) -> Result<u32> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	/// Read a little-endian `i32`.
	pub fn read_i32_le(&mut self) -> Result<i32> {
		Ok(i32::from_le_bytes(self.read_array()?))
	}

	/// Advance to the next 4-byte aligned position, relative to the slice start.
	pub fn align4(&mut self) -> Result<()> {
		let aligned = (self.pos + 3) & !3;
		let skip = aligned.saturating_sub(self.pos);
		let _ = self.read_exact(skip)?;
		Ok(())
	}
}

/// Growable little-endian byte writer.
#[derive(Debug, Default)]
pub struct Writer {
	bytes: Vec<u8>,
}

impl Writer {
	/// Create an empty writer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Return bytes written so far.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Append raw bytes.
	pub fn put_bytes(&mut self, bytes: &[u8]) {
		self.bytes.extend_from_slice(bytes);
	}

	/// Append one byte.
	pub fn put_u8(&mut self, value: u8) {
		self.bytes.push(value);
	}

	/// Append a little-endian `u16`.
	pub fn put_u16_le(&mut self, value: u16) {
		self.put_bytes(&value.to_le_bytes());
	}

	/// Append a little-endian `u32`.
	pub fn put_u32_le(&mut self, value: u32) {
		self.put_bytes(&value.to_le_bytes());
	}

	/// Append a little-endian `i32`.
	pub fn put_i32_le(&mut self, value: i32) {
		self.put_bytes(&value.to_le_bytes());
	}

	/// Overwrite a previously written little-endian `u32` at `at`.
	pub fn patch_u32_le(&mut self, at: usize, value: u32) {
		self.bytes[at..at + 4].copy_from_slice(&value.to_le_bytes());
	}

	/// Zero-pad to the next 4-byte boundary.
	pub fn pad4(&mut self) {
		while self.bytes.len() % 4 != 0 {
			self.bytes.push(0);
		}
	}

	/// Finish and return the written bytes.
	pub fn into_bytes(self) -> Vec<u8> {
		self.bytes
	}
}
