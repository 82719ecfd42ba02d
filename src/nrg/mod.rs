//! NERO (`.nrg`) container parsing and payload extraction.
//!
//! ## Architecture
//!
//! - [`codec`]: fixed-size big-endian record decoding and seeking
//! - [`structures`]: trailer formats, chunk headers and chunk bodies
//! - [`parser`]: format detection and the chunk stream walk
//! - [`extractor`]: high-level extraction API for end users
//!
//! ## NRG Format Overview
//!
//! An NRG file consists of:
//! 1. The disc image data, stored as raw sectors
//! 2. A stream of metadata chunks (`CUEX`, `DAOX`, `SINF`, `MTYP`, ... `END!`)
//! 3. A trailer holding a version marker and the offset of the first chunk
//!
//! Every chunk is a 4-byte ASCII tag, a 4-byte big-endian body size, and the
//! body. Bodies may be longer than the layout known for their tag; the
//! excess is skipped.
//!
//! | Version | Marker at | Chunk offset |
//! |---------|-----------|--------------|
//! | `NERO`  | EOF-8     | u32 at EOF-4 |
//! | `NER5`  | EOF-12    | u64 at EOF-8 |
//!
//! ## Limitations
//!
//! - Only disc-at-once images (`DAOX`) are extracted
//! - Track-at-once chunks (`ETNF`/`ETN2`) are not recognised
//! - Only the data range of the `DAOX` chunk is copied, with no sector
//!   conversion

pub mod codec;
mod error;
mod extractor;
mod parser;
mod structures;

pub use error::{NrgError, Result};
pub use extractor::{ChunkListing, NrgExtractor, convert};
pub use parser::NrgParser;
pub use structures::*;
