mod local;

pub use local::LocalFileReader;

use std::io::{self, Read, Seek, Write};

use crate::nrg::NrgError;
use crate::nrg::codec::seek_start;

/// Copy exactly `len` bytes starting at `start` from `reader` into `writer`.
///
/// Fails with [`NrgError::TruncatedInput`] if the source ends early; bytes
/// already written stay in `writer`.
pub fn copy_range<R, W>(reader: &mut R, writer: &mut W, start: u64, len: u64) -> Result<u64, NrgError>
where
    R: Read + Seek,
    W: Write,
{
    seek_start(reader, start)?;

    let copied = io::copy(&mut reader.by_ref().take(len), writer)?;
    if copied < len {
        return Err(NrgError::TruncatedInput {
            needed: len,
            source: io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("source ended {copied} bytes into a {len}-byte payload"),
            ),
        });
    }

    writer.flush()?;
    Ok(copied)
}
