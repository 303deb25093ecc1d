//! Keyword scan over a PNG chunk stream.

use std::io::{self, BufRead};

use charcard_png::{ChunkReader, ChunkType, Error as PngError, TextChunk};
use serde_json::Value;
use tracing::{debug, trace};

use crate::payload::decode_payload;
use crate::{CardVersion, ScanOptions};

/// Find the first `tEXt` chunk carrying `keyword` and decode its payload.
///
/// Only an I/O failure of the underlying stream is an error. A stream that is
/// not a PNG, a truncated or malformed PNG, a PNG without the keyword, and a
/// payload that fails to decode all yield `Ok(None)`.
///
/// Malformed `tEXt` chunks (no NUL separator, non-UTF-8 halves, bad CRC when
/// [`ScanOptions::verify_crc`] is set) are skipped and scanning continues.
/// Once a chunk with the right keyword is found its payload decides the
/// result: a decode failure ends the scan with `Ok(None)` unless
/// [`ScanOptions::retry_after_decode_failure`] is set, in which case later
/// chunks with the same keyword are tried.
pub fn scan_for_keyword<R: BufRead>(
    reader: R,
    keyword: &str,
    options: &ScanOptions,
) -> io::Result<Option<Value>> {
    let mut chunks = match ChunkReader::new(reader) {
        Ok(chunks) => chunks.with_crc_check(options.verify_crc),
        Err(err) => return stop_scan(err, keyword),
    };

    loop {
        let chunk = match chunks.next_chunk_of(ChunkType::TEXT) {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(err @ PngError::CrcMismatch { .. }) => {
                debug!(error = %err, "skipping tEXt chunk");
                continue;
            }
            Err(err) => return stop_scan(err, keyword),
        };

        let text = match TextChunk::parse(chunk.data()) {
            Ok(text) => text,
            Err(err) => {
                debug!(error = %err, "skipping malformed tEXt chunk");
                continue;
            }
        };

        if text.keyword() != keyword {
            trace!(keyword = text.keyword(), "ignoring tEXt chunk");
            continue;
        }

        match decode_payload(text.text()) {
            Ok(document) => {
                debug!(keyword, "found character card");
                return Ok(Some(document));
            }
            Err(err) => {
                debug!(keyword, error = %err, "failed to decode card payload");
                if !options.retry_after_decode_failure {
                    return Ok(None);
                }
            }
        }
    }

    debug!(keyword, "no matching tEXt chunk");
    Ok(None)
}

/// Scan any buffered stream for a card of the given version.
pub fn read_card_from_reader<R: BufRead>(
    reader: R,
    version: CardVersion,
    options: &ScanOptions,
) -> io::Result<Option<Value>> {
    scan_for_keyword(reader, version.keyword(), options)
}

/// Turn a chunk-level error into the scan outcome.
fn stop_scan(err: PngError, keyword: &str) -> io::Result<Option<Value>> {
    match err {
        PngError::Io(source) => Err(source),
        other => {
            debug!(keyword, error = %other, "stopping scan on malformed PNG");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use std::io::BufReader;

    use super::*;
    use crate::test_support::{card_chunk, json_value, png_with, FailingReader};

    fn scan(png: &[u8], version: CardVersion) -> Option<Value> {
        read_card_from_reader(png, version, &ScanOptions::default()).unwrap()
    }

    #[test]
    fn test_keyword_isolation() {
        let v2 = json!({"name": "Old", "first_mes": "hi"});
        let png = png_with(&[card_chunk("chara", &v2)]);

        assert_eq!(scan(&png, CardVersion::V2), Some(v2));
        assert_eq!(scan(&png, CardVersion::V3), None);
    }

    #[test]
    fn test_both_conventions_coexist() {
        let v2 = json!({"name": "Legacy"});
        let v3 = json!({"spec": "chara_card_v3", "data": {"name": "New"}});
        let png = png_with(&[card_chunk("chara", &v2), card_chunk("ccv3", &v3)]);

        assert_eq!(scan(&png, CardVersion::V2), Some(v2));
        assert_eq!(scan(&png, CardVersion::V3), Some(v3));
    }

    #[test]
    fn test_unknown_chunks_are_skipped() {
        let v3 = json!({"data": {"name": "Skipper"}});
        let png = png_with(&[
            (ChunkType::ZTXT, b"Comment\0\0x\x9c\x03\x00\x00\x00\x00\x01".to_vec()),
            (ChunkType::ITXT, b"XML:com.adobe.xmp\0\0\0\0\0<x/>".to_vec()),
            (ChunkType(*b"prVt"), vec![0xAB; 300]),
            (ChunkType::TEXT, b"Software\0paint".to_vec()),
            card_chunk("ccv3", &v3),
            (ChunkType(*b"zzZz"), Vec::new()),
            (ChunkType::ZTXT, b"After\0\0junk".to_vec()),
        ]);

        assert_eq!(scan(&png, CardVersion::V3), Some(v3));
    }

    #[test]
    fn test_malformed_text_chunks_are_skipped() {
        let v2 = json!({"name": "Survivor"});
        let png = png_with(&[
            (ChunkType::TEXT, b"no separator here".to_vec()),
            (ChunkType::TEXT, b"ch\xffra\0e30=".to_vec()),
            (ChunkType::TEXT, b"chara\0\xc3\x28".to_vec()),
            card_chunk("chara", &v2),
        ]);

        assert_eq!(scan(&png, CardVersion::V2), Some(v2));
    }

    #[test]
    fn test_malformed_payload_is_not_found() {
        let cases: [&[u8]; 3] = [
            b"ccv3\0!!!not base64!!!",
            b"ccv3\0//79",         // not UTF-8
            b"ccv3\0bm90IGpzb24=", // "not json"
        ];
        for text in cases {
            let png = png_with(&[(ChunkType::TEXT, text.to_vec())]);
            assert_eq!(scan(&png, CardVersion::V3), None);
        }
    }

    #[test]
    fn test_first_match_wins_without_retry() {
        let good = json!({"name": "Second"});
        let png = png_with(&[
            (ChunkType::TEXT, b"ccv3\0@@@@".to_vec()),
            card_chunk("ccv3", &good),
        ]);

        assert_eq!(scan(&png, CardVersion::V3), None);

        let retry = ScanOptions::default().with_retry_after_decode_failure(true);
        let found = read_card_from_reader(png.as_slice(), CardVersion::V3, &retry).unwrap();
        assert_eq!(found, Some(good));
    }

    #[test]
    fn test_first_of_two_valid_chunks_wins() {
        let first = json!({"name": "First"});
        let png = png_with(&[
            card_chunk("chara", &first),
            card_chunk("chara", &json!({"name": "Second"})),
        ]);

        assert_eq!(scan(&png, CardVersion::V2), Some(first));
    }

    #[test]
    fn test_crc_verification() {
        let stale = json!({"name": "Corrupted"});
        let fresh = json!({"name": "Intact"});
        let mut png = png_with(&[card_chunk("chara", &stale), card_chunk("chara", &fresh)]);
        // Corrupt the first chunk's stored CRC: signature, IHDR (25), then
        // the card chunk's 8 byte header and data
        let first_len = 6 + crate::encode_payload(&stale).len();
        let crc_at = 8 + 25 + 8 + first_len;
        png[crc_at] ^= 0xFF;

        assert_eq!(scan(&png, CardVersion::V2), Some(stale));

        let strict = ScanOptions::default().with_crc_check(true);
        let found = read_card_from_reader(png.as_slice(), CardVersion::V2, &strict).unwrap();
        assert_eq!(found, Some(fresh));
    }

    #[test]
    fn test_non_png_is_not_found() {
        let jpeg = b"\xff\xd8\xff\xe0\x00\x10JFIF\x00\x01\x01\x00\x00\x01\x00\x01\x00\x00\xff\xd9";
        assert_eq!(scan(jpeg, CardVersion::V3), None);
        assert_eq!(scan(b"", CardVersion::V2), None);
    }

    #[test]
    fn test_truncated_png_is_not_found() {
        let png = png_with(&[card_chunk("ccv3", &json!({"name": "Cut"}))]);
        // Ends inside the card chunk's data
        let cut = &png[..8 + 25 + 20];

        assert_eq!(scan(cut, CardVersion::V3), None);
    }

    #[test]
    fn test_card_after_iend_is_ignored() {
        let mut png = png_with(&[]);
        charcard_png::write_chunk(
            &mut png,
            ChunkType::TEXT,
            &card_chunk("ccv3", &json!({"name": "Late"})).1,
        )
        .unwrap();

        assert_eq!(scan(&png, CardVersion::V3), None);
    }

    #[test]
    fn test_read_error_is_reported() {
        // Signature 0..8, IHDR 8..33, private chunk 33..145, card tEXt from 145
        let png = png_with(&[
            (ChunkType(*b"prVt"), vec![0x55; 100]),
            card_chunk("ccv3", &json!({"name": "Unreachable"})),
        ]);

        let positions = [
            ("signature", 4),
            ("IHDR header", 12),
            ("skipped IHDR body", 20),
            ("skipped private body", 80),
            ("tEXt header", 148),
            ("tEXt body", 160),
        ];
        for (place, fail_at) in positions {
            let reader = BufReader::with_capacity(4, FailingReader::new(png.clone(), fail_at));
            let result = read_card_from_reader(reader, CardVersion::V3, &ScanOptions::default());

            match result {
                Err(err) => assert_eq!(err.kind(), io::ErrorKind::Other, "{}", place),
                Ok(found) => panic!("read error in {} reported as {:?}", place, found),
            }
        }
    }

    #[test]
    fn test_read_error_after_card_is_not_reached() {
        let v3 = json!({"name": "Early"});
        let png = png_with(&[card_chunk("ccv3", &v3)]);
        let reader = BufReader::with_capacity(4, FailingReader::new(png.clone(), png.len() - 12));

        let found = read_card_from_reader(reader, CardVersion::V3, &ScanOptions::default()).unwrap();
        assert_eq!(found, Some(v3));
    }

    proptest! {
        #[test]
        fn prop_round_trip(document in json_value()) {
            let png = png_with(&[card_chunk("ccv3", &document)]);
            prop_assert_eq!(scan(&png, CardVersion::V3), Some(document));
        }

        #[test]
        fn prop_random_bytes_never_error(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
            prop_assert!(read_card_from_reader(bytes.as_slice(), CardVersion::V3, &ScanOptions::default()).is_ok());
        }
    }
}
