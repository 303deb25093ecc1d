//! Error types for PNG chunk handling.

use thiserror::Error;

use crate::ChunkType;

/// Errors that can occur when reading or writing PNG chunks.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error other than a short read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] charcard_common::Error),

    /// The stream does not start with the PNG signature.
    #[error("invalid PNG signature: {0:02x?}")]
    InvalidSignature([u8; 8]),

    /// The stream ended in the middle of the signature or a chunk.
    #[error("PNG stream truncated")]
    Truncated,

    /// A chunk length is above the format limit.
    #[error("chunk {chunk_type} has length {length}, above the 2^31-1 limit")]
    ChunkTooLong { chunk_type: ChunkType, length: u64 },

    /// Stored CRC does not match the chunk contents.
    #[error("CRC mismatch in {chunk_type} chunk: declared {expected:#010x}, computed {actual:#010x}")]
    CrcMismatch {
        chunk_type: ChunkType,
        expected: u32,
        actual: u32,
    },

    /// The PNG has no IEND chunk to insert before.
    #[error("PNG has no IEND chunk")]
    MissingIend,

    /// Text chunk keyword is empty, too long, or contains a NUL.
    #[error("invalid tEXt keyword: {0}")]
    InvalidKeyword(String),

    /// Invalid IHDR contents.
    #[error("invalid IHDR chunk: {0}")]
    InvalidHeader(String),
}

impl Error {
    /// Map a raw I/O error, treating a short read as truncation.
    pub(crate) fn from_read(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::Truncated
        } else {
            Error::Io(err)
        }
    }
}

/// Result type for PNG operations.
pub type Result<T> = std::result::Result<T, Error>;
