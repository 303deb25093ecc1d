//! Chunk types and framed chunk values.

use std::fmt;
use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};
use charcard_common::crc;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::text::TextChunk;
use crate::{Error, Result, MAX_CHUNK_LEN};

/// A four-byte PNG chunk type tag.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const PLTE: Self = Self(*b"PLTE");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const IEND: Self = Self(*b"IEND");
    /// Uncompressed Latin-1 text.
    pub const TEXT: Self = Self(*b"tEXt");
    /// Compressed text.
    pub const ZTXT: Self = Self(*b"zTXt");
    /// International (UTF-8) text.
    pub const ITXT: Self = Self(*b"iTXt");

    /// Get the raw tag bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Critical chunks have an uppercase first letter.
    #[inline]
    pub const fn is_critical(&self) -> bool {
        self.0[0] & 0x20 == 0
    }

    /// Private chunks have a lowercase second letter.
    #[inline]
    pub const fn is_private(&self) -> bool {
        self.0[1] & 0x20 != 0
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({})", self)
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

/// The 8 bytes that precede every chunk's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ChunkHeader {
    length: [u8; 4],
    chunk_type: [u8; 4],
}

impl ChunkHeader {
    /// Build a header for `length` bytes of `chunk_type` data.
    pub const fn new(chunk_type: ChunkType, length: u32) -> Self {
        Self {
            length: length.to_be_bytes(),
            chunk_type: chunk_type.0,
        }
    }

    /// Declared data length.
    #[inline]
    pub const fn length(&self) -> u32 {
        u32::from_be_bytes(self.length)
    }

    /// Chunk type tag.
    #[inline]
    pub const fn chunk_type(&self) -> ChunkType {
        ChunkType(self.chunk_type)
    }
}

/// A chunk with its data loaded.
#[derive(Clone, PartialEq, Eq)]
pub struct Chunk {
    chunk_type: ChunkType,
    data: Vec<u8>,
    declared_crc: u32,
}

impl Chunk {
    /// Create a chunk from parts read off a stream.
    pub fn new(chunk_type: ChunkType, data: Vec<u8>, declared_crc: u32) -> Self {
        Self {
            chunk_type,
            data,
            declared_crc,
        }
    }

    /// Create a chunk with a freshly computed CRC.
    pub fn with_computed_crc(chunk_type: ChunkType, data: Vec<u8>) -> Self {
        let declared_crc = crc::chunk_crc(&chunk_type.0, &data);
        Self::new(chunk_type, data, declared_crc)
    }

    /// Chunk type tag.
    #[inline]
    pub fn chunk_type(&self) -> ChunkType {
        self.chunk_type
    }

    /// Chunk data, without framing.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the chunk and return its data.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// CRC stored in the file.
    #[inline]
    pub fn declared_crc(&self) -> u32 {
        self.declared_crc
    }

    /// CRC computed over the type and data.
    pub fn computed_crc(&self) -> u32 {
        crc::chunk_crc(&self.chunk_type.0, &self.data)
    }

    /// Check the stored CRC against the contents.
    pub fn crc_matches(&self) -> bool {
        self.declared_crc == self.computed_crc()
    }

    /// Parse as a `tEXt` chunk. Returns `None` for any other chunk type.
    pub fn as_text(&self) -> Option<Result<TextChunk<'_>>> {
        (self.chunk_type == ChunkType::TEXT).then(|| TextChunk::parse(&self.data))
    }

    /// Write the framed chunk, keeping the declared CRC as-is.
    ///
    /// Fails with [`Error::ChunkTooLong`] before writing anything when the
    /// data does not fit the format's length field.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let length = checked_length(self.chunk_type, self.data.len())?;
        writer.write_all(ChunkHeader::new(self.chunk_type, length).as_bytes())?;
        writer.write_all(&self.data)?;
        writer.write_u32::<BigEndian>(self.declared_crc)?;
        Ok(())
    }
}

/// Data length as stored in a chunk header, at most [`MAX_CHUNK_LEN`].
pub(crate) fn checked_length(chunk_type: ChunkType, len: usize) -> Result<u32> {
    u32::try_from(len)
        .ok()
        .filter(|&length| length <= MAX_CHUNK_LEN)
        .ok_or(Error::ChunkTooLong {
            chunk_type,
            length: len as u64,
        })
}

impl fmt::Debug for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("chunk_type", &self.chunk_type)
            .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
            .field("declared_crc", &self.declared_crc)
            .finish()
    }
}
