//! PNG CRC-32 checksums.
//!
//! Every PNG chunk carries a CRC-32 (ISO 3309, reflected polynomial
//! `0xEDB88320`) computed over the chunk type and data, but not the length.

const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 {
                0xEDB8_8320 ^ (c >> 1)
            } else {
                c >> 1
            };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// Incremental CRC-32 state.
///
/// Lets the chunk reader checksum the type tag and data without joining them
/// into one buffer.
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    /// Start a new checksum.
    #[inline]
    pub const fn new() -> Self {
        Self { state: u32::MAX }
    }

    /// Feed more bytes into the checksum.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            let index = (self.state ^ u32::from(byte)) as u8 as usize;
            self.state = CRC_TABLE[index] ^ (self.state >> 8);
        }
    }

    /// Finish and return the checksum value.
    #[inline]
    pub const fn finish(self) -> u32 {
        self.state ^ u32::MAX
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the CRC-32 of a byte slice.
#[inline]
pub fn hash_bytes(data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(data);
    crc.finish()
}

/// Compute the CRC-32 a PNG chunk declares: over the type tag, then the data.
#[inline]
pub fn chunk_crc(chunk_type: &[u8; 4], data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(chunk_type);
    crc.update(data);
    crc.finish()
}
