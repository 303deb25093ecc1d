//! Error types for character card handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by card readers and embedding.
///
/// Readers only ever return [`Error::Io`]; an absent or malformed card is
/// `Ok(None)`, not an error.
#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be opened or read.
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PNG error while embedding a card.
    #[error(transparent)]
    Png(#[from] charcard_png::Error),
}

/// Why an embedded payload could not be turned into a document.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Text is not valid base64.
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Decoded bytes are not UTF-8.
    #[error("payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Decoded text is not JSON.
    #[error("payload is not JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for card operations.
pub type Result<T> = std::result::Result<T, Error>;
