//! Base64 JSON payloads.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde_json::Value;

use crate::DecodeError;

/// Standard alphabet, padding optional. Card writers disagree on padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode `base64(utf8(json))` text into a document.
///
/// ASCII whitespace in the text is ignored so line-wrapped payloads decode.
pub fn decode_payload(text: &str) -> Result<Value, DecodeError> {
    let compact: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    let bytes = LENIENT.decode(compact)?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}

/// Encode a document as compact JSON in padded standard base64.
pub fn encode_payload(document: &Value) -> String {
    STANDARD.encode(document.to_string())
}
