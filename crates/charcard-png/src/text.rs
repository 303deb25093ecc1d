//! `tEXt` chunk parsing and encoding.

use charcard_common::BinaryReader;

use crate::{Error, Result};

/// Longest keyword the PNG format permits.
pub const MAX_KEYWORD_LEN: usize = 79;

/// A `tEXt` key/value pair borrowed from chunk data.
///
/// On disk the data is `keyword`, one NUL byte, then `text`. The format says
/// Latin-1; both halves are decoded as UTF-8 here, which agrees for the ASCII
/// keywords and base64 payloads character cards use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunk<'a> {
    keyword: &'a str,
    text: &'a str,
}

impl<'a> TextChunk<'a> {
    /// Create a text chunk, validating the keyword.
    pub fn new(keyword: &'a str, text: &'a str) -> Result<Self> {
        if keyword.is_empty() || keyword.len() > MAX_KEYWORD_LEN {
            return Err(Error::InvalidKeyword(format!(
                "length {} outside 1..={}",
                keyword.len(),
                MAX_KEYWORD_LEN
            )));
        }
        if keyword.contains('\0') {
            return Err(Error::InvalidKeyword(format!("{:?} contains NUL", keyword)));
        }
        Ok(Self { keyword, text })
    }

    /// Split chunk data at the first NUL and decode both halves.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        let keyword = reader.read_cstring()?;
        let text = std::str::from_utf8(reader.remaining_bytes())
            .map_err(charcard_common::Error::Utf8)?;

        Ok(Self { keyword, text })
    }

    /// The keyword before the NUL separator.
    #[inline]
    pub fn keyword(&self) -> &'a str {
        self.keyword
    }

    /// The text after the NUL separator.
    #[inline]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Encode as chunk data.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.keyword.len() + 1 + self.text.len());
        data.extend_from_slice(self.keyword.as_bytes());
        data.push(0);
        data.extend_from_slice(self.text.as_bytes());
        data
    }
}
