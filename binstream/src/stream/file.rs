use std::fs::{ File, OpenOptions, };
use std::io::{ Read, Seek, SeekFrom, Write, };
use std::path::Path;

use crate::error::StreamError;

use super::{ ByteStream, SeekOrigin, };

/// File-backed stream. Capabilities reflect the mode the file was opened with.
#[derive(Debug)]
pub struct FileStream {
	file: File,
	readable: bool,
	writable: bool,
}

impl FileStream {
	/// Opens an existing file for reading.
	pub fn open<P: AsRef<Path>>(file_name: P) -> Result<Self, StreamError> {
		log::trace!("opening '{}' for reading", file_name.as_ref().display());

		let file = OpenOptions::new()
			.read(true)
			.open(file_name)?;

		Ok(FileStream {
			file,
			readable: true,
			writable: false,
		})
	}

	/// Creates a file for writing, truncating it if it already exists.
	pub fn create<P: AsRef<Path>>(file_name: P) -> Result<Self, StreamError> {
		log::trace!("opening '{}' for writing", file_name.as_ref().display());

		let file = OpenOptions::new()
			.write(true)
			.create(true)
			.truncate(true)
			.open(file_name)?;

		Ok(FileStream {
			file,
			readable: false,
			writable: true,
		})
	}
}

impl ByteStream for FileStream {
	fn can_read(&self) -> bool {
		self.readable
	}

	fn can_seek(&self) -> bool {
		true
	}

	fn can_write(&self) -> bool {
		self.writable
	}

	fn position(&mut self) -> Result<u64, StreamError> {
		Ok(self.file.stream_position()?)
	}

	fn len(&mut self) -> Result<u64, StreamError> {
		Ok(self.file.metadata()?.len())
	}

	fn set_len(&mut self, length: u64) -> Result<(), StreamError> {
		self.file.set_len(length)?;
		Ok(())
	}

	fn seek(&mut self, offset: i64, origin: SeekOrigin) -> Result<u64, StreamError> {
		let target = match origin {
			SeekOrigin::Begin => {
				if offset < 0 {
					return Err(StreamError::ArgumentOutOfRange);
				}
				SeekFrom::Start(offset as u64)
			},
			SeekOrigin::Current => SeekFrom::Current(offset),
			SeekOrigin::End => SeekFrom::End(offset),
		};

		Ok(self.file.seek(target)?)
	}

	fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StreamError> {
		Ok(self.file.read(buffer)?)
	}

	fn read_byte(&mut self) -> Result<Option<u8>, StreamError> {
		let mut buffer = [0];
		if self.file.read(&mut buffer)? == 0 {
			Ok(None)
		} else {
			Ok(Some(buffer[0]))
		}
	}

	fn write(&mut self, buffer: &[u8]) -> Result<(), StreamError> {
		self.file.write_all(buffer)?;
		Ok(())
	}

	fn write_byte(&mut self, byte: u8) -> Result<(), StreamError> {
		self.file.write_all(&[byte])?;
		Ok(())
	}

	fn flush(&mut self) -> Result<(), StreamError> {
		self.file.flush()?;
		Ok(())
	}

	fn close(&mut self) -> Result<(), StreamError> {
		self.flush()
	}
}
