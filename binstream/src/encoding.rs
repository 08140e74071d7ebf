/// How many bytes encode one character in stream text payloads. Chosen when a reader is constructed; the producer
/// and consumer of a payload must agree on the width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharWidth {
	/// One byte per character.
	Single,
	/// Two bytes per character, little-endian code units.
	Double,
}

/// Converts a single byte into a character.
pub fn char_from_byte(byte: u8) -> char {
	byte as char
}

/// Composes a little-endian two byte code unit into a character. Code units with no scalar value (the surrogate
/// range) produce nothing.
pub fn char_from_pair(low: u8, high: u8) -> Option<char> {
	let code = (low as u32) | ((high as u32) << 8);
	char::from_u32(code)
}
