//! PNG chunk handling for charcard.
//!
//! A PNG file is an 8-byte signature followed by a sequence of chunks. Each
//! chunk is framed as:
//!
//! | field  | size     | notes                               |
//! |--------|----------|-------------------------------------|
//! | length | 4        | big-endian, data length only        |
//! | type   | 4        | ASCII tag such as `IHDR` or `tEXt`  |
//! | data   | `length` |                                     |
//! | crc    | 4        | CRC-32 over type and data           |
//!
//! This crate reads that framing from any buffered stream without decoding
//! image data, parses `tEXt` key/value chunks, and can insert a new `tEXt`
//! chunk into an existing PNG.
//!
//! # Example
//!
//! ```no_run
//! use charcard_png::{ChunkReader, ChunkType, TextChunk};
//!
//! let mut reader = ChunkReader::open("card.png")?;
//! while let Some(chunk) = reader.next_chunk_of(ChunkType::TEXT)? {
//!     let text = TextChunk::parse(chunk.data())?;
//!     println!("{}: {} bytes", text.keyword(), text.text().len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod chunk;
mod error;
mod ihdr;
mod reader;
mod text;
mod writer;

pub use chunk::{Chunk, ChunkHeader, ChunkType};
pub use error::{Error, Result};
pub use ihdr::{ColorType, ImageHeader};
pub use reader::ChunkReader;
pub use text::{TextChunk, MAX_KEYWORD_LEN};
pub use writer::{insert_text_chunk, write_chunk};

/// PNG file signature.
pub const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// Largest chunk length the PNG format allows (2^31 - 1).
pub const MAX_CHUNK_LEN: u32 = 0x7FFF_FFFF;
