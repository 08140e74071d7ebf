use crate::encoding::{ self, CharWidth, };
use crate::error::StreamError;
use crate::stream::{ ByteStream, SeekOrigin, };

/// Largest primitive the reader decodes in one call.
const PRIMITIVE_BUFFER_SIZE: usize = 8;

/// How many string payload bytes are pulled from the stream per chunk.
const CHUNK_BUFFER_SIZE: usize = 128;

/// Reads fixed-layout little-endian primitives, length-prefixed strings, and characters out of a `ByteStream`.
///
/// A reader borrows its stream for its whole lifetime and must be the stream's only consumer while it lives. The
/// stream's cursor is the reader's only cross-call state besides two scratch buffers, which are sized on first use
/// and reused so that typed reads never allocate.
pub struct BinaryReader<'a> {
	stream: Option<&'a mut dyn ByteStream>,
	scratch: Vec<u8>,
	chunk: Vec<u8>,
	width: CharWidth,
}

impl<'a> BinaryReader<'a> {
	/// Binds a reader to a stream with single byte characters.
	pub fn new(stream: &'a mut dyn ByteStream) -> Self {
		BinaryReader::with_width(stream, CharWidth::Single)
	}

	/// Binds a reader to a stream with an explicit character width.
	pub fn with_width(stream: &'a mut dyn ByteStream, width: CharWidth) -> Self {
		BinaryReader {
			stream: Some(stream),
			scratch: Vec::new(),
			chunk: Vec::new(),
			width,
		}
	}

	/// A reader with no bound stream. Every typed operation fails with `NullStream`.
	pub fn unbound() -> Self {
		BinaryReader {
			stream: None,
			scratch: Vec::new(),
			chunk: Vec::new(),
			width: CharWidth::Single,
		}
	}

	/// The character width the reader was constructed with.
	pub fn width(&self) -> CharWidth {
		self.width
	}

	/// Fills the front of the scratch buffer with exactly `count` bytes. Streams may return partial data from any
	/// one `read` call, so the bulk path accumulates until the target is reached, failing the moment a read returns
	/// nothing short of the target.
	fn fill(&mut self, count: usize) -> Result<(), StreamError> {
		let stream = self.stream.as_deref_mut().ok_or(StreamError::NullStream)?;
		if count > PRIMITIVE_BUFFER_SIZE {
			return Err(StreamError::ArgumentOutOfRange);
		}

		if self.scratch.is_empty() {
			self.scratch.resize(PRIMITIVE_BUFFER_SIZE, 0);
		}

		// single byte fills skip the bulk path
		if count == 1 {
			let byte = stream.read_byte()?.ok_or(StreamError::EndOfStream)?;
			self.scratch[0] = byte;
			return Ok(());
		}

		let mut offset = 0;
		while offset < count {
			let read = stream.read(&mut self.scratch[offset..count])?;
			if read == 0 {
				return Err(StreamError::EndOfStream);
			}
			offset += read;
		}
		return Ok(());
	}

	/// Reads one byte; any nonzero value is true.
	pub fn read_bool(&mut self) -> Result<bool, StreamError> {
		self.fill(1)?;
		Ok(self.scratch[0] > 0)
	}

	/// Reads one byte.
	pub fn read_u8(&mut self) -> Result<u8, StreamError> {
		let stream = self.stream.as_deref_mut().ok_or(StreamError::NullStream)?;
		stream.read_byte()?.ok_or(StreamError::EndOfStream)
	}

	/// Reads one byte as a signed value.
	pub fn read_i8(&mut self) -> Result<i8, StreamError> {
		Ok(self.read_u8()? as i8)
	}

	/// Reads two bytes in little-endian format.
	pub fn read_u16(&mut self) -> Result<u16, StreamError> {
		self.fill(2)?;

		let mut number = 0;
		for i in 0..2 {
			number |= (self.scratch[i] as u16) << (i * 8);
		}
		return Ok(number);
	}

	/// Reads two bytes in little-endian format as a signed value.
	pub fn read_i16(&mut self) -> Result<i16, StreamError> {
		Ok(self.read_u16()? as i16)
	}

	/// Reads four bytes in little-endian format.
	pub fn read_u32(&mut self) -> Result<u32, StreamError> {
		self.fill(4)?;

		let mut number = 0;
		for i in 0..4 {
			number |= (self.scratch[i] as u32) << (i * 8);
		}
		return Ok(number);
	}

	/// Reads four bytes in little-endian format as a signed value.
	pub fn read_i32(&mut self) -> Result<i32, StreamError> {
		Ok(self.read_u32()? as i32)
	}

	/// Reads eight bytes in little-endian format, composed as two 32 bit halves with the low word first.
	pub fn read_u64(&mut self) -> Result<u64, StreamError> {
		self.fill(8)?;

		let mut low: u32 = 0;
		let mut high: u32 = 0;
		for i in 0..4 {
			low |= (self.scratch[i] as u32) << (i * 8);
			high |= (self.scratch[i + 4] as u32) << (i * 8);
		}
		return Ok(((high as u64) << 32) | low as u64);
	}

	/// Reads eight bytes in little-endian format as a signed value.
	pub fn read_i64(&mut self) -> Result<i64, StreamError> {
		Ok(self.read_u64()? as i64)
	}

	/// Reads four bytes and reinterprets the little-endian bit pattern as a float. Bit-exact, never a numeric
	/// conversion.
	pub fn read_f32(&mut self) -> Result<f32, StreamError> {
		Ok(f32::from_bits(self.read_u32()?))
	}

	/// Reads eight bytes and reinterprets the little-endian bit pattern as a double.
	pub fn read_f64(&mut self) -> Result<f64, StreamError> {
		Ok(f64::from_bits(self.read_u64()?))
	}

	/// Reads a variable length integer stored in 7 bit groups, little-endian group order. Bit 7 of each byte flags a
	/// following group. A value that does not terminate within 5 groups is malformed.
	pub fn read_varint(&mut self) -> Result<i32, StreamError> {
		let mut number: i32 = 0;
		let mut shift = 0;
		loop {
			if shift == 35 {
				return Err(StreamError::BadVarIntFormat);
			}

			let byte = self.read_u8()?;
			number |= ((byte & 0x7F) as i32) << shift;
			shift += 7;

			if byte & 0x80 == 0 {
				break;
			}
		}
		return Ok(number);
	}

	/// Reads a length-prefixed string: a varint byte length followed by exactly that many encoded text bytes,
	/// consumed in chunks of up to 128 bytes. In double byte mode a code unit split across a chunk boundary is
	/// carried into the next chunk, and a lone byte at the very end of the payload degrades to a single byte decode.
	pub fn read_string(&mut self) -> Result<String, StreamError> {
		let length = self.read_varint()?;
		if length < 0 {
			return Err(StreamError::InvalidFormat);
		}
		if length == 0 {
			return Ok(String::new());
		}

		log::trace!("reading string payload of {} bytes", length);

		if self.chunk.is_empty() {
			self.chunk.resize(CHUNK_BUFFER_SIZE, 0);
		}

		let mut output = String::new();
		let mut remaining = length as usize;
		let mut carry: Option<u8> = None;
		while remaining > 0 {
			let target = remaining.min(CHUNK_BUFFER_SIZE);
			let stream = self.stream.as_deref_mut().ok_or(StreamError::NullStream)?;
			let read = stream.read(&mut self.chunk[..target])?;
			if read == 0 {
				return Err(StreamError::EndOfStream);
			}
			remaining -= read;

			match self.width {
				CharWidth::Single => {
					for &byte in &self.chunk[..read] {
						output.push(encoding::char_from_byte(byte));
					}
				},
				CharWidth::Double => {
					let mut index = 0;
					if let Some(low) = carry.take() {
						if let Some(character) = encoding::char_from_pair(low, self.chunk[0]) {
							output.push(character);
						}
						index = 1;
					}

					while index + 2 <= read {
						if let Some(character) = encoding::char_from_pair(self.chunk[index], self.chunk[index + 1]) {
							output.push(character);
						}
						index += 2;
					}

					if index < read {
						if remaining > 0 {
							carry = Some(self.chunk[index]);
						} else {
							output.push(encoding::char_from_byte(self.chunk[index]));
						}
					}
				},
			}
		}
		return Ok(output);
	}

	/// Decodes one character. Fails with `EndOfStream` if the stream runs out before a character is produced.
	pub fn read_char(&mut self) -> Result<char, StreamError> {
		match self.read_one_char()? {
			Some(character) => Ok(character),
			None => Err(StreamError::EndOfStream),
		}
	}

	/// Decodes one character without consuming it. Returns `Ok(None)` when the stream cannot seek (peeking needs a
	/// restorable cursor, so on such streams it is a no-op, not a failure) or when the stream is exhausted.
	pub fn peek_char(&mut self) -> Result<Option<char>, StreamError> {
		let entry = {
			let stream = self.stream.as_deref_mut().ok_or(StreamError::NullStream)?;
			if !stream.can_seek() {
				return Ok(None);
			}
			stream.position()?
		};

		let result = self.read_one_char();

		let stream = self.stream.as_deref_mut().ok_or(StreamError::NullStream)?;
		stream.seek(entry as i64, SeekOrigin::Begin)?;
		return result;
	}

	/// Decodes exactly one character, retrying until a code unit with a scalar value is found. Returns `None` at the
	/// end of the stream. If the stream can seek, a stream fault mid-decode rewinds to the entry position before the
	/// error surfaces, so a failed character read consumes nothing.
	fn read_one_char(&mut self) -> Result<Option<char>, StreamError> {
		let width = self.width;
		let stream = self.stream.as_deref_mut().ok_or(StreamError::NullStream)?;

		let entry = if stream.can_seek() {
			Some(stream.position()?)
		} else {
			None
		};

		let result = Self::decode_one_char(stream, width);
		if result.is_err() {
			if let Some(position) = entry {
				stream.seek(position as i64, SeekOrigin::Begin)?;
			}
		}
		return result;
	}

	fn decode_one_char(stream: &mut dyn ByteStream, width: CharWidth) -> Result<Option<char>, StreamError> {
		loop {
			let first = match stream.read_byte()? {
				Some(byte) => byte,
				None => return Ok(None),
			};

			match width {
				CharWidth::Single => return Ok(Some(encoding::char_from_byte(first))),
				CharWidth::Double => {
					let character = match stream.read_byte()? {
						// the stream ended between the two halves, so only one byte is available
						None => Some(encoding::char_from_byte(first)),
						Some(second) => encoding::char_from_pair(first, second),
					};

					if let Some(character) = character {
						return Ok(Some(character));
					}
				},
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use crate::error::StreamError;
	use crate::stream::{ ByteStream, MemoryStream, SeekOrigin, };

	use super::BinaryReader;

	/// Returns at most one byte per bulk read no matter how many were asked for.
	struct TrickleStream {
		buffer: Vec<u8>,
		position: usize,
	}

	impl TrickleStream {
		fn new(buffer: Vec<u8>) -> Self {
			TrickleStream {
				buffer,
				position: 0,
			}
		}
	}

	impl ByteStream for TrickleStream {
		fn can_read(&self) -> bool {
			true
		}

		fn can_seek(&self) -> bool {
			false
		}

		fn can_write(&self) -> bool {
			false
		}

		fn position(&mut self) -> Result<u64, StreamError> {
			Ok(self.position as u64)
		}

		fn len(&mut self) -> Result<u64, StreamError> {
			Ok(self.buffer.len() as u64)
		}

		fn set_len(&mut self, _length: u64) -> Result<(), StreamError> {
			Err(StreamError::ArgumentOutOfRange)
		}

		fn seek(&mut self, _offset: i64, _origin: SeekOrigin) -> Result<u64, StreamError> {
			Err(StreamError::ArgumentOutOfRange)
		}

		fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StreamError> {
			if self.position >= self.buffer.len() || buffer.is_empty() {
				return Ok(0);
			}

			buffer[0] = self.buffer[self.position];
			self.position += 1;
			return Ok(1);
		}

		fn read_byte(&mut self) -> Result<Option<u8>, StreamError> {
			if self.position >= self.buffer.len() {
				return Ok(None);
			}

			let byte = self.buffer[self.position];
			self.position += 1;
			return Ok(Some(byte));
		}

		fn write(&mut self, _buffer: &[u8]) -> Result<(), StreamError> {
			Err(StreamError::ArgumentOutOfRange)
		}

		fn write_byte(&mut self, _byte: u8) -> Result<(), StreamError> {
			Err(StreamError::ArgumentOutOfRange)
		}

		fn flush(&mut self) -> Result<(), StreamError> {
			Ok(())
		}

		fn close(&mut self) -> Result<(), StreamError> {
			Ok(())
		}
	}

	/// Seekable stream that reports an i/o fault after a set number of byte reads.
	struct FaultyStream {
		inner: MemoryStream,
		reads_before_fault: usize,
	}

	impl ByteStream for FaultyStream {
		fn can_read(&self) -> bool {
			true
		}

		fn can_seek(&self) -> bool {
			true
		}

		fn can_write(&self) -> bool {
			false
		}

		fn position(&mut self) -> Result<u64, StreamError> {
			self.inner.position()
		}

		fn len(&mut self) -> Result<u64, StreamError> {
			self.inner.len()
		}

		fn set_len(&mut self, length: u64) -> Result<(), StreamError> {
			self.inner.set_len(length)
		}

		fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, StreamError> {
			self.inner.seek(offset, origin)
		}

		fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StreamError> {
			self.inner.read(buffer)
		}

		fn read_byte(&mut self) -> Result<Option<u8>, StreamError> {
			if self.reads_before_fault == 0 {
				return Err(StreamError::Io(std::io::Error::from(std::io::ErrorKind::Other)));
			}

			self.reads_before_fault -= 1;
			self.inner.read_byte()
		}

		fn write(&mut self, buffer: &[u8]) -> Result<(), StreamError> {
			self.inner.write(buffer)
		}

		fn write_byte(&mut self, byte: u8) -> Result<(), StreamError> {
			self.inner.write_byte(byte)
		}

		fn flush(&mut self) -> Result<(), StreamError> {
			Ok(())
		}

		fn close(&mut self) -> Result<(), StreamError> {
			Ok(())
		}
	}

	#[test]
	fn fill_accumulates_partial_reads() {
		let mut stream = TrickleStream::new(vec![0xEF, 0xCD, 0xAB, 0x89, 0x67, 0x45, 0x23, 0x01]);
		let mut reader = BinaryReader::new(&mut stream);

		assert_eq!(reader.read_u64().unwrap(), 0x0123_4567_89AB_CDEF);
	}

	#[test]
	fn short_stream_fails_instead_of_fabricating() {
		let mut stream = MemoryStream::from_vec(vec![0x11, 0x22]);
		let mut reader = BinaryReader::new(&mut stream);

		assert!(matches!(reader.read_u32(), Err(StreamError::EndOfStream)));
	}

	#[test]
	fn varint_rejects_unterminated_groups() {
		let mut stream = MemoryStream::from_vec(vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
		let mut reader = BinaryReader::new(&mut stream);

		assert!(matches!(reader.read_varint(), Err(StreamError::BadVarIntFormat)));
	}

	#[test]
	fn varint_stops_at_clear_continuation_bit() {
		// 300 = 0xAC 0x02
		let mut stream = MemoryStream::from_vec(vec![0xAC, 0x02, 0x7F]);
		let mut reader = BinaryReader::new(&mut stream);

		assert_eq!(reader.read_varint().unwrap(), 300);
		assert_eq!(reader.read_varint().unwrap(), 127);
	}

	#[test]
	fn string_with_negative_length_is_invalid() {
		// varint decoding to -1
		let mut stream = MemoryStream::from_vec(vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
		let mut reader = BinaryReader::new(&mut stream);

		assert!(matches!(reader.read_string(), Err(StreamError::InvalidFormat)));
	}

	#[test]
	fn string_truncated_payload_fails() {
		let mut stream = MemoryStream::from_vec(vec![5, b'a', b'b']);
		let mut reader = BinaryReader::new(&mut stream);

		assert!(matches!(reader.read_string(), Err(StreamError::EndOfStream)));
	}

	#[test]
	fn failed_char_read_rewinds_seekable_stream() {
		let mut stream = FaultyStream {
			inner: MemoryStream::from_vec(vec![0x41, 0x42]),
			reads_before_fault: 0,
		};
		let mut reader = BinaryReader::new(&mut stream);

		assert!(matches!(reader.read_char(), Err(StreamError::Io(_))));
		drop(reader);
		assert_eq!(stream.position().unwrap(), 0);
	}

	#[test]
	fn peek_on_unseekable_stream_is_a_no_op() {
		let mut stream = TrickleStream::new(vec![0x41]);
		let mut reader = BinaryReader::new(&mut stream);

		assert_eq!(reader.peek_char().unwrap(), None);
		assert_eq!(reader.read_char().unwrap(), 'A');
	}

	#[test]
	fn unbound_reader_fails_every_operation() {
		let mut reader = BinaryReader::unbound();

		assert!(matches!(reader.read_bool(), Err(StreamError::NullStream)));
		assert!(matches!(reader.read_u8(), Err(StreamError::NullStream)));
		assert!(matches!(reader.read_u16(), Err(StreamError::NullStream)));
		assert!(matches!(reader.read_u32(), Err(StreamError::NullStream)));
		assert!(matches!(reader.read_u64(), Err(StreamError::NullStream)));
		assert!(matches!(reader.read_f32(), Err(StreamError::NullStream)));
		assert!(matches!(reader.read_f64(), Err(StreamError::NullStream)));
		assert!(matches!(reader.read_varint(), Err(StreamError::NullStream)));
		assert!(matches!(reader.read_string(), Err(StreamError::NullStream)));
		assert!(matches!(reader.read_char(), Err(StreamError::NullStream)));
		assert!(matches!(reader.peek_char(), Err(StreamError::NullStream)));
	}
}
