//! Common utilities for charcard.
//!
//! This crate provides foundational types and utilities used across all charcard crates:
//!
//! - [`BinaryReader`] - Zero-copy big-endian reading from byte slices
//! - [`ReadExt`] - Fixed-layout struct reads from streams
//! - [`crc`] - PNG CRC-32 checksums

mod error;
mod reader;

pub mod crc;

pub use error::{Error, Result};
pub use reader::{BinaryReader, ReadExt};
