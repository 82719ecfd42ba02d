//! # nrg2iso
//!
//! Extract the ISO payload from NERO (`.nrg`) disc images.
//!
//! An NRG file is a plain sector dump followed by a chain of metadata
//! chunks and a short trailer. This library reads the trailer to find the
//! chunk chain, walks it to the `DAOX` chunk describing where the track data
//! lives, and copies that byte range out unchanged.
//!
//! ## Features
//!
//! - Both `NERO` (32-bit) and `NER5` (64-bit) container versions
//! - Tolerates chunk bodies larger than their known layout
//! - Chunk listing without extraction
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use nrg2iso::NrgExtractor;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut extractor = NrgExtractor::open(Path::new("disc.nrg"))?;
//!     let plan = extractor.extract_to_file(Path::new("disc.iso"))?;
//!     println!("wrote {} bytes", plan.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod io;
pub mod nrg;

pub use cli::Cli;
pub use io::{LocalFileReader, copy_range};
pub use nrg::{Chunk, ChunkListing, ContainerFormat, ExtractionPlan, NrgError, NrgExtractor, convert};
