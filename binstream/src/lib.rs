pub mod encoding;
pub mod error;
pub mod reader;
pub mod stream;
pub mod writer;

pub use encoding::CharWidth;
pub use error::StreamError;
pub use reader::BinaryReader;
pub use stream::ByteStream;
pub use stream::FileStream;
pub use stream::MemoryStream;
pub use stream::SeekOrigin;
pub use writer::BinaryWriter;
