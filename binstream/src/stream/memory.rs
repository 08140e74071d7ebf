use crate::error::StreamError;

use super::{ ByteStream, SeekOrigin, };

/// Growable in-memory stream. Reading past the end returns zero bytes. Writing past the end grows the buffer, zero
/// filling any gap left by a seek beyond the current length.
#[derive(Debug, Default)]
pub struct MemoryStream {
	buffer: Vec<u8>,
	position: u64,
}

impl MemoryStream {
	pub fn new() -> Self {
		MemoryStream::default()
	}

	/// Wraps an existing buffer, with the cursor at the start.
	pub fn from_vec(buffer: Vec<u8>) -> Self {
		MemoryStream {
			buffer,
			position: 0,
		}
	}

	/// Consumes the stream and returns its buffer.
	pub fn into_inner(self) -> Vec<u8> {
		self.buffer
	}

	/// Returns the stream's buffer.
	pub fn get_buffer(&self) -> &[u8] {
		&self.buffer
	}
}

impl ByteStream for MemoryStream {
	fn can_read(&self) -> bool {
		true
	}

	fn can_seek(&self) -> bool {
		true
	}

	fn can_write(&self) -> bool {
		true
	}

	fn position(&mut self) -> Result<u64, StreamError> {
		Ok(self.position)
	}

	fn len(&mut self) -> Result<u64, StreamError> {
		Ok(self.buffer.len() as u64)
	}

	fn set_len(&mut self, length: u64) -> Result<(), StreamError> {
		self.buffer.resize(length as usize, 0);
		Ok(())
	}

	fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, StreamError> {
		let base = match origin {
			SeekOrigin::Begin => 0,
			SeekOrigin::Current => self.position as i64,
			SeekOrigin::End => self.buffer.len() as i64,
		};

		let target = base + offset;
		if target < 0 {
			return Err(StreamError::ArgumentOutOfRange);
		}

		self.position = target as u64;
		return Ok(self.position);
	}

	fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StreamError> {
		let position = self.position as usize;
		if position >= self.buffer.len() {
			return Ok(0);
		}

		let amount = buffer.len().min(self.buffer.len() - position);
		buffer[..amount].copy_from_slice(&self.buffer[position..position + amount]);
		self.position += amount as u64;
		return Ok(amount);
	}

	fn read_byte(&mut self) -> Result<Option<u8>, StreamError> {
		let position = self.position as usize;
		if position >= self.buffer.len() {
			return Ok(None);
		}

		self.position += 1;
		return Ok(Some(self.buffer[position]));
	}

	fn write(&mut self, buffer: &[u8]) -> Result<(), StreamError> {
		let position = self.position as usize;
		let end = position + buffer.len();
		if end > self.buffer.len() {
			self.buffer.resize(end, 0);
		}

		self.buffer[position..end].copy_from_slice(buffer);
		self.position = end as u64;
		return Ok(());
	}

	fn write_byte(&mut self, byte: u8) -> Result<(), StreamError> {
		self.write(&[byte])
	}

	fn flush(&mut self) -> Result<(), StreamError> {
		Ok(())
	}

	fn close(&mut self) -> Result<(), StreamError> {
		Ok(())
	}
}
