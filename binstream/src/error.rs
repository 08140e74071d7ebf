use thiserror::Error;

/// Failure reported by a stream or by the binary reader/writer. Every fallible operation in this crate reports
/// through this type; there is no sentinel-value side channel for a caller to forget to check.
#[derive(Debug, Error)]
pub enum StreamError {
	/// A requested size or seek target is outside the range the operation can honor.
	#[error("requested size or offset is out of range")]
	ArgumentOutOfRange,
	/// A variable length integer did not terminate within the maximum allowed groups.
	#[error("variable length integer did not terminate within 5 groups")]
	BadVarIntFormat,
	/// The stream ran out before the requested amount of data was available.
	#[error("unexpected end of stream")]
	EndOfStream,
	/// A declared length or other framing value is structurally invalid.
	#[error("invalid framing in stream data")]
	InvalidFormat,
	#[error("stream i/o failure: {0}")]
	Io(#[from] std::io::Error),
	/// The reader/writer has no bound stream.
	#[error("no stream is bound")]
	NullStream,
}
