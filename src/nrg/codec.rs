//! Fixed-size big-endian record decoding.
//!
//! Every NRG structure has a layout whose width is known at compile time.
//! Records are read by pulling exactly [`Record::SIZE`] bytes off the stream
//! and decoding them from a [`Cursor`](std::io::Cursor) over that buffer, so a
//! short read is always detected before any field is interpreted.

use byteorder::{BigEndian, ReadBytesExt};
use std::fmt;
use std::io::{self, Read, Seek, SeekFrom, Write};

use super::error::{NrgError, Result};

/// A fixed-width big-endian binary layout.
pub trait Record: Sized {
    /// Exact encoded width in bytes.
    const SIZE: usize;

    /// Decode from a buffer of at least [`Self::SIZE`] bytes.
    fn from_bytes(data: &[u8]) -> Result<Self>;

    /// Encode into `writer`, writing exactly [`Self::SIZE`] bytes.
    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()>;
}

/// Reference point for [`seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Current,
    End,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Anchor::Start => "start",
            Anchor::Current => "current position",
            Anchor::End => "end",
        })
    }
}

/// Read one record at the stream's current position.
///
/// The stream advances by exactly `T::SIZE` bytes on success. Fails with
/// [`NrgError::TruncatedInput`] if fewer bytes remain.
pub fn read_record<T: Record, R: Read + ?Sized>(reader: &mut R) -> Result<T> {
    let mut buf = vec![0u8; T::SIZE];
    reader
        .read_exact(&mut buf)
        .map_err(|e| NrgError::read(T::SIZE as u64, e))?;
    T::from_bytes(&buf)
}

/// Read a big-endian unsigned integer that is `width` bytes wide (1..=8).
pub fn read_uint_be<R: Read + ?Sized>(reader: &mut R, width: usize) -> Result<u64> {
    reader
        .read_uint::<BigEndian>(width)
        .map_err(|e| NrgError::read(width as u64, e))
}

/// Reposition `stream` relative to `anchor`, returning the new absolute offset.
pub fn seek<S: Seek + ?Sized>(stream: &mut S, offset: i64, anchor: Anchor) -> Result<u64> {
    let pos = match anchor {
        Anchor::Start => match u64::try_from(offset) {
            Ok(offset) => SeekFrom::Start(offset),
            Err(_) => {
                return Err(NrgError::SeekOutOfRange {
                    offset: offset.into(),
                    anchor,
                    source: io::Error::new(io::ErrorKind::InvalidInput, "negative offset"),
                });
            }
        },
        Anchor::Current => SeekFrom::Current(offset),
        Anchor::End => SeekFrom::End(offset),
    };

    stream.seek(pos).map_err(|source| NrgError::SeekOutOfRange {
        offset: offset.into(),
        anchor,
        source,
    })
}

/// Move `stream` to an absolute `offset`.
///
/// Offsets beyond `i64::MAX` cannot be addressed and fail with
/// [`NrgError::SeekOutOfRange`] carrying the offset as given.
pub fn seek_start<S: Seek + ?Sized>(stream: &mut S, offset: u64) -> Result<u64> {
    match i64::try_from(offset) {
        Ok(signed) => seek(stream, signed, Anchor::Start),
        Err(_) => Err(NrgError::SeekOutOfRange {
            offset: offset.into(),
            anchor: Anchor::Start,
            source: io::Error::new(io::ErrorKind::InvalidInput, "offset exceeds i64::MAX"),
        }),
    }
}
