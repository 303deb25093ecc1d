//! Synthetic PNG fixtures for tests.

use std::io::{self, Read, Write};

use charcard_png::{write_chunk, ChunkType, PNG_SIGNATURE};
use proptest::prelude::*;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::encode_payload;

/// 1x1 RGBA header; always 25 bytes once framed.
const IHDR: [u8; 13] = [0, 0, 0, 1, 0, 0, 0, 1, 8, 6, 0, 0, 0];

/// Signature, IHDR, the given chunks, one IDAT, IEND.
pub(crate) fn png_with(chunks: &[(ChunkType, Vec<u8>)]) -> Vec<u8> {
    let mut out = PNG_SIGNATURE.to_vec();
    write_chunk(&mut out, ChunkType::IHDR, &IHDR).unwrap();
    for (chunk_type, data) in chunks {
        write_chunk(&mut out, *chunk_type, data).unwrap();
    }
    write_chunk(&mut out, ChunkType::IDAT, &[0x78, 0x9c, 0x63, 0x00, 0x00]).unwrap();
    write_chunk(&mut out, ChunkType::IEND, &[]).unwrap();
    out
}

/// A `tEXt` chunk carrying `document` under `keyword`.
pub(crate) fn card_chunk(keyword: &str, document: &Value) -> (ChunkType, Vec<u8>) {
    let mut data = keyword.as_bytes().to_vec();
    data.push(0);
    data.extend_from_slice(encode_payload(document).as_bytes());
    (ChunkType::TEXT, data)
}

pub(crate) fn temp_file(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

/// Serves `bytes` up to `fail_at`, then fails every read with
/// [`io::ErrorKind::Other`].
pub(crate) struct FailingReader {
    bytes: Vec<u8>,
    position: usize,
    fail_at: usize,
}

impl FailingReader {
    pub(crate) fn new(bytes: Vec<u8>, fail_at: usize) -> Self {
        Self {
            bytes,
            position: 0,
            fail_at,
        }
    }
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.position >= self.fail_at {
            return Err(io::Error::other("device went away"));
        }
        let end = self.fail_at.min(self.bytes.len()).min(self.position + buf.len());
        let count = end.saturating_sub(self.position);
        buf[..count].copy_from_slice(&self.bytes[self.position..end]);
        self.position += count;
        Ok(count)
    }
}

/// Arbitrary JSON without floats, which do not survive a text round trip
/// bit for bit.
pub(crate) fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<String>().prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,12}", inner, 0..6)
                .prop_map(|fields| Value::Object(fields.into_iter().collect())),
        ]
    })
}
