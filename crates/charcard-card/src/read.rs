//! Path-based card readers.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use crate::scan::read_card_from_reader;
use crate::{Card, CardVersion, Error, Result, ScanOptions};

/// Read a legacy V2 card (`chara` keyword) from a PNG file.
pub fn read_v2<P: AsRef<Path>>(path: P) -> Result<Option<Value>> {
    read_card(path, CardVersion::V2)
}

/// Read a V3 card (`ccv3` keyword) from a PNG file.
pub fn read_v3<P: AsRef<Path>>(path: P) -> Result<Option<Value>> {
    read_card(path, CardVersion::V3)
}

/// Read a card of the given version with default [`ScanOptions`].
pub fn read_card<P: AsRef<Path>>(path: P, version: CardVersion) -> Result<Option<Value>> {
    read_card_with(path, version, &ScanOptions::default())
}

/// Read a card of the given version.
///
/// The file is opened, scanned until the card is found or the chunks run
/// out, and closed before returning. Returns [`Error::Io`] when the file
/// cannot be opened or read; every other failure is `Ok(None)`.
pub fn read_card_with<P: AsRef<Path>>(
    path: P,
    version: CardVersion,
    options: &ScanOptions,
) -> Result<Option<Value>> {
    let path = path.as_ref();
    let io_error = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    read_card_from_reader(BufReader::new(file), version, options).map_err(io_error)
}

/// Read whichever card a PNG carries, preferring V3 over V2.
pub fn read_any<P: AsRef<Path>>(path: P, options: &ScanOptions) -> Result<Option<Card>> {
    let path = path.as_ref();

    for version in [CardVersion::V3, CardVersion::V2] {
        if let Some(document) = read_card_with(path, version, options)? {
            return Ok(Some(Card { version, document }));
        }
    }
    Ok(None)
}
