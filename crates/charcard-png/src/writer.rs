//! Chunk writing and `tEXt` insertion.

use std::io::Write;

use tracing::debug;

use crate::chunk::{checked_length, Chunk, ChunkType};
use crate::reader::ChunkReader;
use crate::text::TextChunk;
use crate::{Error, Result, PNG_SIGNATURE};

/// Write one framed chunk with a freshly computed CRC.
pub fn write_chunk<W: Write>(writer: &mut W, chunk_type: ChunkType, data: &[u8]) -> Result<()> {
    Chunk::with_computed_crc(chunk_type, data.to_vec()).write_to(writer)
}

/// Insert a `tEXt` chunk into a PNG, immediately before `IEND`.
///
/// Every other chunk is copied through byte for byte, CRC included. Existing
/// `tEXt` chunks carrying the same keyword are dropped so readers that stop
/// at the first match see the new text. Anything after `IEND` is discarded.
/// Text too long for one chunk is rejected with [`Error::ChunkTooLong`].
pub fn insert_text_chunk(png: &[u8], text: &TextChunk<'_>) -> Result<Vec<u8>> {
    let data = text.to_bytes();
    checked_length(ChunkType::TEXT, data.len())?;

    let mut reader = ChunkReader::new(png)?;
    let mut out = Vec::with_capacity(png.len() + data.len() + 12);
    out.extend_from_slice(PNG_SIGNATURE);

    while let Some(chunk) = reader.next_chunk()? {
        match chunk.chunk_type() {
            ChunkType::IEND => {
                write_chunk(&mut out, ChunkType::TEXT, &data)?;
                chunk.write_to(&mut out)?;
                return Ok(out);
            }
            ChunkType::TEXT => {
                let same_keyword = chunk
                    .as_text()
                    .and_then(|parsed| parsed.ok())
                    .is_some_and(|existing| existing.keyword() == text.keyword());
                if same_keyword {
                    debug!(keyword = text.keyword(), "replacing existing tEXt chunk");
                    continue;
                }
                chunk.write_to(&mut out)?;
            }
            _ => chunk.write_to(&mut out)?,
        }
    }

    Err(Error::MissingIend)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_png() -> Vec<u8> {
        let mut out = PNG_SIGNATURE.to_vec();
        write_chunk(&mut out, ChunkType::IHDR, &[0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0]).unwrap();
        write_chunk(&mut out, ChunkType::TEXT, b"Software\0paint").unwrap();
        write_chunk(&mut out, ChunkType::TEXT, b"chara\0old").unwrap();
        write_chunk(&mut out, ChunkType::IDAT, &[9, 9, 9]).unwrap();
        write_chunk(&mut out, ChunkType::IEND, &[]).unwrap();
        out
    }

    fn texts(png: &[u8]) -> Vec<(String, String)> {
        let mut reader = ChunkReader::new(png).unwrap();
        let mut out = Vec::new();
        while let Some(chunk) = reader.next_chunk_of(ChunkType::TEXT).unwrap() {
            let text = TextChunk::parse(chunk.data()).unwrap();
            out.push((text.keyword().to_string(), text.text().to_string()));
        }
        out
    }

    #[test]
    fn test_insert_before_iend() {
        let png = base_png();
        let text = TextChunk::new("ccv3", "e30=").unwrap();
        let out = insert_text_chunk(&png, &text).unwrap();

        let mut reader = ChunkReader::new(out.as_slice()).unwrap().with_crc_check(true);
        let mut types = Vec::new();
        while let Some(chunk) = reader.next_chunk().unwrap() {
            types.push(chunk.chunk_type());
        }
        assert_eq!(
            types,
            [
                ChunkType::IHDR,
                ChunkType::TEXT,
                ChunkType::TEXT,
                ChunkType::IDAT,
                ChunkType::TEXT,
                ChunkType::IEND
            ]
        );
        assert_eq!(out.len(), png.len() + 12 + "ccv3\0e30=".len());
    }

    #[test]
    fn test_insert_replaces_same_keyword() {
        let png = base_png();
        let text = TextChunk::new("chara", "new").unwrap();
        let out = insert_text_chunk(&png, &text).unwrap();

        assert_eq!(
            texts(&out),
            [
                ("Software".to_string(), "paint".to_string()),
                ("chara".to_string(), "new".to_string()),
            ]
        );
    }

    #[test]
    fn test_insert_without_iend() {
        let mut png = PNG_SIGNATURE.to_vec();
        write_chunk(&mut png, ChunkType::IHDR, &[0; 13]).unwrap();

        let text = TextChunk::new("ccv3", "e30=").unwrap();
        assert!(matches!(
            insert_text_chunk(&png, &text),
            Err(Error::MissingIend)
        ));
    }

    #[test]
    fn test_insert_into_non_png() {
        let text = TextChunk::new("ccv3", "e30=").unwrap();
        assert!(matches!(
            insert_text_chunk(b"GIF89a....", &text),
            Err(Error::InvalidSignature(_))
        ));
    }
}
