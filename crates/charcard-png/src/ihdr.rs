//! IHDR image header.

use std::fmt;

use charcard_common::BinaryReader;

use crate::{Error, Result};

/// Pixel color type from the IHDR chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    Grayscale,
    Rgb,
    Indexed,
    GrayscaleAlpha,
    Rgba,
}

impl ColorType {
    fn from_u8(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Grayscale,
            2 => Self::Rgb,
            3 => Self::Indexed,
            4 => Self::GrayscaleAlpha,
            6 => Self::Rgba,
            _ => return None,
        })
    }
}

/// Image dimensions and pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: ColorType,
    pub interlaced: bool,
}

impl ImageHeader {
    /// IHDR data is always 13 bytes.
    pub const SIZE: usize = 13;

    /// Parse IHDR chunk data.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() != Self::SIZE {
            return Err(Error::InvalidHeader(format!(
                "expected {} bytes, got {}",
                Self::SIZE,
                data.len()
            )));
        }

        let mut reader = BinaryReader::new(data);
        let width = reader.read_u32()?;
        let height = reader.read_u32()?;
        let bit_depth = reader.read_u8()?;
        let color_type = reader.read_u8()?;
        let color_type = ColorType::from_u8(color_type)
            .ok_or_else(|| Error::InvalidHeader(format!("unknown color type {}", color_type)))?;

        // compression and filter method are always 0
        let _compression = reader.read_u8()?;
        let _filter = reader.read_u8()?;
        let interlaced = match reader.read_u8()? {
            0 => false,
            1 => true,
            other => {
                return Err(Error::InvalidHeader(format!(
                    "unknown interlace method {}",
                    other
                )))
            }
        };

        if width == 0 || height == 0 {
            return Err(Error::InvalidHeader(format!(
                "zero dimension {}x{}",
                width, height
            )));
        }

        Ok(Self {
            width,
            height,
            bit_depth,
            color_type,
            interlaced,
        })
    }
}

impl fmt::Display for ImageHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} {:?} {}-bit{}",
            self.width,
            self.height,
            self.color_type,
            self.bit_depth,
            if self.interlaced { " interlaced" } else { "" }
        )
    }
}
