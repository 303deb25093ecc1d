//! Scan configuration.

use serde::{Deserialize, Serialize};

/// Controls how strictly a PNG is scanned for a card.
///
/// The default matches long-standing reader behavior: CRCs are not checked
/// and the first `tEXt` chunk with the target keyword decides the outcome,
/// even when its payload turns out to be malformed.
///
/// Can be loaded from an application's own config:
///
/// ```
/// use charcard_card::ScanOptions;
///
/// let options: ScanOptions = serde_json::from_str(r#"{ "verify_crc": true }"#)?;
/// assert!(options.verify_crc);
/// assert!(!options.retry_after_decode_failure);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Skip `tEXt` chunks whose stored CRC does not match their contents.
    pub verify_crc: bool,
    /// Keep scanning for another chunk with the same keyword when the first
    /// one fails to decode.
    pub retry_after_decode_failure: bool,
}

impl ScanOptions {
    /// Enable or disable CRC checking.
    pub fn with_crc_check(mut self, verify: bool) -> Self {
        self.verify_crc = verify;
        self
    }

    /// Enable or disable retrying after a failed decode.
    pub fn with_retry_after_decode_failure(mut self, retry: bool) -> Self {
        self.retry_after_decode_failure = retry;
        self
    }
}
