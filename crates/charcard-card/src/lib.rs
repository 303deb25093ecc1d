//! Character card extraction from PNG images.
//!
//! Character cards are JSON documents embedded in a PNG `tEXt` chunk as
//! `keyword\0base64(json)`. Two conventions exist and may appear in the same
//! file:
//!
//! - `chara` - legacy V2 cards, a flat object
//! - `ccv3` - V3 cards, with most fields nested under `data`
//!
//! Readers return `Ok(Some(document))` when a card is found, `Ok(None)` when
//! it is absent or malformed, and `Err` only when the file itself could not
//! be read.
//!
//! # Example
//!
//! ```no_run
//! use charcard_card::{partition_v3_keys, read_v3};
//!
//! if let Some(card) = read_v3("card.png")? {
//!     let parts = partition_v3_keys(&card);
//!     println!("{}", parts.summary["name"]);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod embed;
mod error;
mod options;
mod partition;
mod payload;
mod read;
mod scan;
mod version;

#[cfg(test)]
mod test_support;

pub use embed::{embed_card, AVATAR_DATA_URL_KEY};
pub use error::{DecodeError, Error, Result};
pub use options::ScanOptions;
pub use partition::{partition_v3_keys, KeyPartition, V3_SUMMARY_KEYS};
pub use payload::{decode_payload, encode_payload};
pub use read::{read_any, read_card, read_card_with, read_v2, read_v3};
pub use scan::{read_card_from_reader, scan_for_keyword};
pub use version::{Card, CardVersion};
