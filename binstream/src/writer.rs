use crate::error::StreamError;
use crate::stream::{ ByteStream, SeekOrigin, };

const SCRATCH_SIZE: usize = 16;

/// Writes fixed-layout little-endian primitives, length-prefixed strings, and raw byte runs to a `ByteStream`.
///
/// A writer borrows its stream for its whole lifetime and must be the stream's only consumer while it lives. Every
/// operation fails fast with `NullStream` when the writer is unbound, without touching the stream.
pub struct BinaryWriter<'a> {
	stream: Option<&'a mut dyn ByteStream>,
	scratch: [u8; SCRATCH_SIZE],
}

impl<'a> BinaryWriter<'a> {
	/// Binds a writer to a stream.
	pub fn new(stream: &'a mut dyn ByteStream) -> Self {
		BinaryWriter {
			stream: Some(stream),
			scratch: [0; SCRATCH_SIZE],
		}
	}

	/// A writer with no bound stream. Every operation fails with `NullStream`.
	pub fn unbound() -> Self {
		BinaryWriter {
			stream: None,
			scratch: [0; SCRATCH_SIZE],
		}
	}

	/// Writes one byte, 0 or 1.
	pub fn write_bool(&mut self, value: bool) -> Result<(), StreamError> {
		self.write_u8(value as u8)
	}

	/// Writes one byte.
	pub fn write_u8(&mut self, byte: u8) -> Result<(), StreamError> {
		let stream = self.stream.as_deref_mut().ok_or(StreamError::NullStream)?;
		stream.write_byte(byte)
	}

	/// Writes one byte from a signed value.
	pub fn write_i8(&mut self, byte: i8) -> Result<(), StreamError> {
		self.write_u8(byte as u8)
	}

	/// Writes two bytes in little-endian format.
	pub fn write_u16(&mut self, number: u16) -> Result<(), StreamError> {
		let mut shift = number;
		for i in 0..2 {
			self.scratch[i] = (shift & 0xFF) as u8;
			shift >>= 8;
		}

		let stream = self.stream.as_deref_mut().ok_or(StreamError::NullStream)?;
		stream.write(&self.scratch[..2])
	}

	/// Writes two bytes in little-endian format from a signed value.
	pub fn write_i16(&mut self, number: i16) -> Result<(), StreamError> {
		self.write_u16(number as u16)
	}

	/// Writes four bytes in little-endian format.
	pub fn write_u32(&mut self, number: u32) -> Result<(), StreamError> {
		let mut shift = number;
		for i in 0..4 {
			self.scratch[i] = (shift & 0xFF) as u8;
			shift >>= 8;
		}

		let stream = self.stream.as_deref_mut().ok_or(StreamError::NullStream)?;
		stream.write(&self.scratch[..4])
	}

	/// Writes four bytes in little-endian format from a signed value.
	pub fn write_i32(&mut self, number: i32) -> Result<(), StreamError> {
		self.write_u32(number as u32)
	}

	/// Writes eight bytes in little-endian format, low word first.
	pub fn write_u64(&mut self, number: u64) -> Result<(), StreamError> {
		let mut shift = number;
		for i in 0..8 {
			self.scratch[i] = (shift & 0xFF) as u8;
			shift >>= 8;
		}

		let stream = self.stream.as_deref_mut().ok_or(StreamError::NullStream)?;
		stream.write(&self.scratch[..8])
	}

	/// Writes eight bytes in little-endian format from a signed value.
	pub fn write_i64(&mut self, number: i64) -> Result<(), StreamError> {
		self.write_u64(number as u64)
	}

	/// Writes the float's bit pattern as four bytes in little-endian format. Bit-exact, never a numeric conversion.
	pub fn write_f32(&mut self, number: f32) -> Result<(), StreamError> {
		self.write_u32(number.to_bits())
	}

	/// Writes the double's bit pattern as eight bytes in little-endian format.
	pub fn write_f64(&mut self, number: f64) -> Result<(), StreamError> {
		self.write_u64(number.to_bits())
	}

	/// Writes the character's code unit as one raw byte. Code points above 255 are truncated; the narrow write
	/// matches the single byte reader path.
	pub fn write_char(&mut self, character: char) -> Result<(), StreamError> {
		self.write_u8(character as u8)
	}

	/// Writes a variable length integer in 7 bit groups, little-endian group order, bit 7 of each byte flagging a
	/// following group. Produces 1 to 5 bytes depending on magnitude.
	pub fn write_varint(&mut self, value: u32) -> Result<(), StreamError> {
		let mut shift = value;
		while shift >= 0x80 {
			self.write_u8(((shift & 0x7F) as u8) | 0x80)?;
			shift >>= 7;
		}
		return self.write_u8(shift as u8);
	}

	/// Strings are length encoded, with a variable length integer representing the byte length followed by the raw
	/// bytes. No terminator is written; a zero length is a valid empty string.
	pub fn write_string(&mut self, string: &str) -> Result<(), StreamError> {
		if string.len() > i32::MAX as usize {
			return Err(StreamError::ArgumentOutOfRange);
		}

		self.write_varint(string.len() as u32)?;

		let stream = self.stream.as_deref_mut().ok_or(StreamError::NullStream)?;
		stream.write(string.as_bytes())
	}

	/// Writes a byte run straight through to the stream.
	pub fn write_bytes(&mut self, buffer: &[u8]) -> Result<(), StreamError> {
		let stream = self.stream.as_deref_mut().ok_or(StreamError::NullStream)?;
		stream.write(buffer)
	}

	/// Moves the stream's cursor, returning the new position.
	pub fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, StreamError> {
		let stream = self.stream.as_deref_mut().ok_or(StreamError::NullStream)?;
		stream.seek(offset, origin)
	}

	/// Flushes the stream.
	pub fn flush(&mut self) -> Result<(), StreamError> {
		let stream = self.stream.as_deref_mut().ok_or(StreamError::NullStream)?;
		stream.flush()
	}
}
