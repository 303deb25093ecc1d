//! Error types for charcard-common.

use thiserror::Error;

/// Errors from reading byte buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer: needed {needed} bytes but only {available} available")]
    UnexpectedEof { needed: usize, available: usize },

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// No NUL byte where a keyword separator was expected.
    #[error("no NUL separator found")]
    MissingNullTerminator,
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
