//! Writing cards into PNGs.

use std::borrow::Cow;

use charcard_png::{insert_text_chunk, TextChunk};
use serde_json::Value;
use tracing::debug;

use crate::payload::encode_payload;
use crate::{CardVersion, Result};

/// Top-level key holding an inline avatar image. The PNG itself is the
/// avatar, so the key is never embedded.
pub const AVATAR_DATA_URL_KEY: &str = "avatar_data_url";

/// Embed `document` into `png` under the keyword for `version`.
///
/// The card goes into a new `tEXt` chunk just before `IEND`; a card already
/// stored under the same keyword is replaced. Pixel data is copied through
/// untouched. A top-level [`AVATAR_DATA_URL_KEY`] is left out of the payload.
pub fn embed_card(png: &[u8], version: CardVersion, document: &Value) -> Result<Vec<u8>> {
    let payload = encode_payload(&without_avatar_data_url(document));
    let text = TextChunk::new(version.keyword(), &payload)?;
    let out = insert_text_chunk(png, &text)?;

    debug!(%version, payload_len = payload.len(), "embedded character card");
    Ok(out)
}

fn without_avatar_data_url(document: &Value) -> Cow<'_, Value> {
    match document {
        Value::Object(fields) if fields.contains_key(AVATAR_DATA_URL_KEY) => {
            let mut fields = fields.clone();
            fields.shift_remove(AVATAR_DATA_URL_KEY);
            Cow::Owned(Value::Object(fields))
        }
        _ => Cow::Borrowed(document),
    }
}
