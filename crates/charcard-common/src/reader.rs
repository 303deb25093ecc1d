//! Binary reader for zero-copy parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! network-order (big-endian) data from a byte slice without copying, and
//! [`ReadExt`] for pulling fixed-layout records out of a stream.

use std::io::{self, Read};

use zerocopy::FromBytes;

use crate::{Error, Result};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// All multi-byte integers are read big-endian, which is the byte order PNG
/// uses for every field.
///
/// # Example
///
/// ```
/// use charcard_common::BinaryReader;
///
/// let data = [0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R'];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_u32().unwrap(), 13);
/// assert_eq!(reader.read_bytes(4).unwrap(), b"IHDR");
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Get the remaining bytes as a slice.
    #[inline]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a fixed-size byte array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a big-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_be_bytes)
    }

    /// Read bytes up to the next NUL and skip the NUL itself.
    ///
    /// The returned slice is not decoded; PNG text keywords are validated by
    /// the caller.
    pub fn read_until_nul(&mut self) -> Result<&'a [u8]> {
        let remaining = self.remaining_bytes();
        let nul_pos = memchr::memchr(0, remaining).ok_or(Error::MissingNullTerminator)?;

        self.position += nul_pos + 1;
        Ok(&remaining[..nul_pos])
    }

    /// Read a NUL-terminated UTF-8 string.
    pub fn read_cstring(&mut self) -> Result<&'a str> {
        let bytes = self.read_until_nul()?;
        std::str::from_utf8(bytes).map_err(Error::Utf8)
    }
}

/// Trait for reading binary data from streams.
///
/// This extends `Read` with a method for reading fixed-size structures,
/// used by the streaming PNG chunk reader for chunk headers.
pub trait ReadExt: Read {
    /// Read a structure from the stream.
    fn read_struct<T: FromBytes>(&mut self) -> io::Result<T> {
        let size = std::mem::size_of::<T>();
        let mut bytes = vec![0u8; size];
        self.read_exact(&mut bytes)?;
        T::read_from_bytes(&bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{:?}", e)))
    }
}

impl<R: Read> ReadExt for R {}
