//! Main entry point for the nrg2iso CLI application.
//!
//! Extracts the data track of a NERO image into a plain ISO image, or lists
//! the image's chunks with `-l`.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

use nrg2iso::{Chunk, ChunkListing, Cli, NrgExtractor};

/// Application entry point.
///
/// Parses command-line arguments, sets up logging, and runs the conversion.
/// Failures are printed to stdout with their full cause chain and turn into
/// exit code 1.
fn main() -> ExitCode {
    let cli = Cli::parse();

    // -v flags pick the default level; RUST_LOG still overrides it
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(()) => {
            if !cli.quiet {
                println!("Done!");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Convert or list a single NRG image based on CLI options.
///
/// This function handles both modes:
/// - List mode (`-l`): Display the container format and its chunks
/// - Extract mode: Copy the `DAOX` data range into `TARGET`
///
/// # Arguments
///
/// * `cli` - Parsed command-line arguments
///
/// # Returns
///
/// Returns `Ok(())` on success, or the first error annotated with the stage
/// that failed.
fn run(cli: &Cli) -> Result<()> {
    let mut extractor = NrgExtractor::open(Path::new(&cli.source))?;

    // List mode: display chunks and exit
    if cli.list {
        let listing = extractor.list_chunks()?;
        print_listing(&listing);
        return Ok(());
    }

    // clap enforces TARGET whenever -l is absent
    let Some(target) = cli.target.as_deref() else {
        anyhow::bail!("missing target path");
    };

    // Extract mode: the target is created only after the payload is located
    let plan = extractor.extract_to_file(Path::new(target))?;
    if !cli.quiet {
        println!("  extracted: {} bytes to {}", plan.len(), target);
    }

    Ok(())
}

/// Print one line per chunk, with the payload range for `DAOX`.
///
/// # Arguments
///
/// * `listing` - Format, first chunk offset and chunks from
///   [`NrgExtractor::list_chunks`]
fn print_listing(listing: &ChunkListing) {
    println!(
        "Format: {}  first chunk at {:#x}",
        listing.format, listing.first_chunk_offset
    );
    println!("{:>4}  {:<4}  Details", "#", "Tag");
    println!("{}", "-".repeat(50));

    for (i, chunk) in listing.chunks.iter().enumerate() {
        let details = match chunk {
            Chunk::Cuex(cue) => format!(
                "track {:02} index {:02} mode {:#04x} lba {}",
                cue.track, cue.index, cue.mode, cue.lba
            ),
            Chunk::Daox(dao) => format!(
                "tracks {}-{} sector {} data [{}, {})",
                dao.first_track, dao.last_track, dao.sector_size, dao.index1, dao.end_of_track
            ),
            Chunk::Sinf(sinf) => format!("{} tracks in session", sinf.tracks),
            Chunk::Mtyp(mtyp) => format!("media type {:#x}", mtyp.value),
            Chunk::End => String::new(),
        };
        println!("{:>4}  {:<4}  {}", i, chunk.tag(), details);
    }
}
