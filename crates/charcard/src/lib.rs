//! charcard - character card extraction and embedding for PNG images.
//!
//! This crate provides a unified interface to the charcard library crates.
//!
//! # Crates
//!
//! - [`charcard_common`] - Common utilities (binary reading, PNG CRC-32)
//! - [`charcard_png`] - Streaming PNG chunk reading and `tEXt` chunks
//! - [`charcard_card`] - V2/V3 card readers, key partitioning, embedding
//!
//! # Example
//!
//! ```no_run
//! use charcard::prelude::*;
//!
//! match read_any("card.png", &ScanOptions::default())? {
//!     Some(card) if card.version == CardVersion::V3 => {
//!         let (summary, data) = partition_v3_keys(&card.document).into_parts();
//!         println!("{} summary fields, data: {}", summary.len(), data);
//!     }
//!     Some(card) => println!("V2 card: {}", card.document),
//!     None => println!("no card"),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use charcard_card as card;
pub use charcard_common as common;
pub use charcard_png as png;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use charcard_card::{
        embed_card, partition_v3_keys, read_any, read_card, read_card_with, read_v2, read_v3,
        Card, CardVersion, KeyPartition, ScanOptions,
    };
    pub use charcard_common::{crc, BinaryReader};
    pub use charcard_png::{Chunk, ChunkReader, ChunkType, ImageHeader, TextChunk};
}

// Re-export commonly used types at the crate root
pub use charcard_card::{Card, CardVersion, ScanOptions};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
