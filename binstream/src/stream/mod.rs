pub mod file;
pub mod memory;

pub use file::FileStream;
pub use memory::MemoryStream;

use crate::error::StreamError;

/// Where a seek offset is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
	Begin,
	Current,
	End,
}

/// Byte transport consumed by the binary reader/writer. Streams do not describe the data format used, and instead
/// facilitate the transport of the format.
///
/// `read` may return fewer bytes than requested without that meaning the stream is over; only a zero-length result
/// signals the end of the stream. `read_byte` returns `None` exactly at the end of the stream.
pub trait ByteStream {
	fn can_read(&self) -> bool;
	fn can_seek(&self) -> bool;
	fn can_write(&self) -> bool;

	/// Cursor position, measured in bytes from the start of the stream.
	fn position(&mut self) -> Result<u64, StreamError>;

	/// Total length of the stream in bytes.
	fn len(&mut self) -> Result<u64, StreamError>;

	/// Truncates or extends the stream to the given length.
	fn set_len(&mut self, length: u64) -> Result<(), StreamError>;

	/// Moves the cursor, returning the new position measured from the start of the stream.
	fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, StreamError>;

	/// Reads up to `buffer.len()` bytes, returning how many were actually read. Zero means end of stream.
	fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StreamError>;

	/// Reads a single byte, or `None` at the end of the stream.
	fn read_byte(&mut self) -> Result<Option<u8>, StreamError>;

	/// Writes the whole buffer.
	fn write(&mut self, buffer: &[u8]) -> Result<(), StreamError>;

	/// Writes a single byte.
	fn write_byte(&mut self, byte: u8) -> Result<(), StreamError>;

	fn flush(&mut self) -> Result<(), StreamError>;

	fn close(&mut self) -> Result<(), StreamError>;
}
