//! Streaming chunk reader.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt};
use charcard_common::ReadExt;
use tracing::trace;

use crate::chunk::{Chunk, ChunkHeader, ChunkType};
use crate::{Error, Result, MAX_CHUNK_LEN, PNG_SIGNATURE};

/// Reads PNG chunks one at a time from a buffered stream.
///
/// The signature is checked on construction. Chunks are then read on demand;
/// data is only buffered for chunks the caller asks for, everything else is
/// skipped by consuming exactly the declared length plus CRC. Reading stops
/// after `IEND` or at a clean end of stream on a chunk boundary.
///
/// When CRC checking is enabled a mismatch is reported as
/// [`Error::CrcMismatch`] and the reader is left positioned at the next
/// chunk, so the caller may keep going.
#[derive(Debug)]
pub struct ChunkReader<R> {
    inner: R,
    verify_crc: bool,
    finished: bool,
}

impl ChunkReader<BufReader<File>> {
    /// Open a PNG file for chunk reading.
    ///
    /// Failing to open the file is reported as [`Error::Io`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: BufRead> ChunkReader<R> {
    /// Wrap a stream positioned at the start of a PNG and check the signature.
    pub fn new(mut inner: R) -> Result<Self> {
        let mut signature = [0u8; 8];
        inner.read_exact(&mut signature).map_err(Error::from_read)?;
        if &signature != PNG_SIGNATURE {
            return Err(Error::InvalidSignature(signature));
        }

        Ok(Self {
            inner,
            verify_crc: false,
            finished: false,
        })
    }

    /// Enable or disable CRC checking of chunks whose data is read.
    pub fn with_crc_check(mut self, verify: bool) -> Self {
        self.verify_crc = verify;
        self
    }

    /// Whether `IEND` or end of stream has been reached.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Read the next chunk, loading its data whatever its type.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        let Some(header) = self.next_header()? else {
            return Ok(None);
        };
        if header.chunk_type() == ChunkType::IEND {
            self.finished = true;
        }
        self.read_body(header).map(Some)
    }

    /// Read forward to the next chunk of type `wanted`.
    ///
    /// Chunks of other types are skipped without buffering their data.
    /// Returns `None` once `IEND` or the end of the stream is reached.
    pub fn next_chunk_of(&mut self, wanted: ChunkType) -> Result<Option<Chunk>> {
        while let Some(header) = self.next_header()? {
            let chunk_type = header.chunk_type();
            if chunk_type == wanted {
                if chunk_type == ChunkType::IEND {
                    self.finished = true;
                }
                return self.read_body(header).map(Some);
            }

            if chunk_type == ChunkType::IEND {
                self.finished = true;
                self.skip_body(header)?;
                return Ok(None);
            }

            trace!(%chunk_type, length = header.length(), "skipping chunk");
            self.skip_body(header)?;
        }
        Ok(None)
    }

    /// Consume the reader and return the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn next_header(&mut self) -> Result<Option<ChunkHeader>> {
        if self.finished {
            return Ok(None);
        }

        if self.inner.fill_buf()?.is_empty() {
            // Missing IEND is tolerated at a chunk boundary
            self.finished = true;
            return Ok(None);
        }

        let header: ChunkHeader = self.inner.read_struct().map_err(Error::from_read)?;
        if header.length() > MAX_CHUNK_LEN {
            self.finished = true;
            return Err(Error::ChunkTooLong {
                chunk_type: header.chunk_type(),
                length: u64::from(header.length()),
            });
        }

        Ok(Some(header))
    }

    fn read_body(&mut self, header: ChunkHeader) -> Result<Chunk> {
        let length = header.length() as u64;
        let mut data = Vec::new();
        // Grows as bytes arrive, so a bogus length on a short file stays cheap
        let read = (&mut self.inner).take(length).read_to_end(&mut data)?;
        if read as u64 != length {
            self.finished = true;
            return Err(Error::Truncated);
        }

        let declared_crc = self
            .inner
            .read_u32::<BigEndian>()
            .map_err(Error::from_read)?;
        let chunk = Chunk::new(header.chunk_type(), data, declared_crc);

        if self.verify_crc && !chunk.crc_matches() {
            return Err(Error::CrcMismatch {
                chunk_type: chunk.chunk_type(),
                expected: declared_crc,
                actual: chunk.computed_crc(),
            });
        }

        Ok(chunk)
    }

    fn skip_body(&mut self, header: ChunkHeader) -> Result<()> {
        let length = header.length() as u64 + 4;
        let skipped = io::copy(&mut (&mut self.inner).take(length), &mut io::sink())?;
        if skipped != length {
            self.finished = true;
            return Err(Error::Truncated);
        }
        Ok(())
    }
}
