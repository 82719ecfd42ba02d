//! Low-level NRG container parser.
//!
//! ## Parsing Strategy
//!
//! NRG files are designed to be read from the end:
//! 1. Identify the format version from the marker in the trailer
//! 2. Read the first-chunk offset stored in the last 4 or 8 bytes
//! 3. Walk the chunk stream from that offset until `DAOX` or `END!`
//!
//! Each chunk body is decoded with its fixed layout, and any bytes the
//! header declares beyond that layout are skipped unread.

use log::{debug, info, trace};
use std::io::{Read, Seek};

use super::codec::{Anchor, read_record, read_uint_be, seek, seek_start};
use super::error::{NrgError, Result};
use super::structures::*;

/// Low-level NRG parser over a seekable byte stream.
///
/// Typically used through [`NrgExtractor`](super::NrgExtractor)
/// rather than directly.
///
/// ## Example
///
/// ```ignore
/// let mut parser = NrgParser::new(reader);
/// let format = parser.detect_format()?;
/// let offset = parser.first_chunk_offset(format)?;
/// parser.seek_to(offset)?;
/// let dao = parser.find_payload()?;
/// ```
pub struct NrgParser<R> {
    reader: R,
}

impl<R: Read + Seek> NrgParser<R> {
    /// Create a new parser for the given reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - A seekable byte stream holding the whole container
    ///
    /// # Returns
    ///
    /// A new parser instance. Nothing is read until a method is called.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Determine the container version from its trailer marker.
    ///
    /// Versions are tried in [`ContainerFormat::ALL`] order and the first
    /// matching marker wins. A stream too short to hold a version's trailer
    /// cannot be that version. The stream is left just past the last marker
    /// read.
    ///
    /// # Errors
    ///
    /// Returns [`NrgError::UnknownFormat`] if no marker matches.
    pub fn detect_format(&mut self) -> Result<ContainerFormat> {
        let len = seek(&mut self.reader, 0, Anchor::End)?;

        for format in ContainerFormat::ALL {
            if len < format.trailer_offset().unsigned_abs() {
                trace!("{len}-byte stream too short for {format} trailer");
                continue;
            }

            seek(&mut self.reader, format.trailer_offset(), Anchor::End)?;
            let mut marker = [0u8; 4];
            self.reader
                .read_exact(&mut marker)
                .map_err(|e| NrgError::read(marker.len() as u64, e))?;

            if &marker == format.marker() {
                info!("Detected {format} image");
                return Ok(format);
            }
        }

        Err(NrgError::UnknownFormat)
    }

    /// Read the chunk-stream start offset from the trailer of `format`.
    ///
    /// # Arguments
    ///
    /// * `format` - The version returned by [`detect_format`](Self::detect_format)
    ///
    /// # Returns
    ///
    /// The absolute offset of the first chunk header, taken from the last
    /// 4 (`NERO`) or 8 (`NER5`) bytes of the file as a big-endian integer.
    ///
    /// # Errors
    ///
    /// Returns [`NrgError::TruncatedInput`] if the file is shorter than the
    /// offset field.
    pub fn first_chunk_offset(&mut self, format: ContainerFormat) -> Result<u64> {
        let width = format.offset_width();
        seek(&mut self.reader, -(width as i64), Anchor::End)?;
        let offset = read_uint_be(&mut self.reader, width)?;
        debug!("First chunk at offset {offset:#x}");
        Ok(offset)
    }

    /// Position the stream at an absolute offset.
    ///
    /// # Errors
    ///
    /// Returns [`NrgError::SeekOutOfRange`] if `offset` cannot be addressed,
    /// reporting the offset exactly as read from the trailer.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        seek_start(&mut self.reader, offset)?;
        Ok(())
    }

    /// Detect the format and move to the first chunk.
    ///
    /// # Returns
    ///
    /// A tuple of (container format, chunk-stream start offset).
    pub fn seek_to_chunks(&mut self) -> Result<(ContainerFormat, u64)> {
        // The trailer gives both the version and where the chunks begin
        let format = self.detect_format()?;
        let offset = self.first_chunk_offset(format)?;
        self.seek_to(offset)?;
        Ok((format, offset))
    }

    /// Decode one chunk at the current position.
    ///
    /// On success the stream sits at the next chunk header, past any slack
    /// the header declared beyond the known body layout.
    ///
    /// # Errors
    ///
    /// - [`NrgError::UnknownChunkTag`] if the tag has no known layout. There
    ///   is no way to find the next header after such a chunk.
    /// - [`NrgError::MalformedChunk`] if the declared size is smaller than the
    ///   layout. Nothing past the header is read in that case.
    /// - [`NrgError::TruncatedInput`] if the stream ends inside the chunk.
    pub fn read_chunk(&mut self) -> Result<Chunk> {
        let header: ChunkHeader = read_record(&mut self.reader)?;

        let required =
            Chunk::body_size(header.tag).ok_or(NrgError::UnknownChunkTag(header.tag))?;
        let slack = i64::from(header.size) - required as i64;
        if slack < 0 {
            return Err(NrgError::MalformedChunk {
                tag: header.tag,
                declared: header.size,
                required,
            });
        }

        let mut body = vec![0u8; required];
        self.reader
            .read_exact(&mut body)
            .map_err(|e| NrgError::read(required as u64, e))?;
        let chunk = Chunk::from_bytes(header.tag, &body)?;

        if slack > 0 {
            trace!("Skipping {slack} trailing bytes of {}", header.tag);
            seek(&mut self.reader, slack, Anchor::Current)?;
        }

        Ok(chunk)
    }

    /// Walk the chunk stream until the `DAOX` chunk.
    ///
    /// `CUEX`, `SINF` and `MTYP` chunks are passed over. Only the `END!`
    /// chunk or an error stops the walk early; no chunk count limit applies.
    ///
    /// # Errors
    ///
    /// Returns [`NrgError::PayloadNotFound`] if `END!` comes first, and any
    /// [`read_chunk`](Self::read_chunk) error unchanged.
    pub fn find_payload(&mut self) -> Result<DaoInfo> {
        loop {
            match self.read_chunk()? {
                Chunk::Daox(dao) => {
                    debug!(
                        "DAOX: tracks {}-{}, sector size {}, data [{}, {})",
                        dao.first_track, dao.last_track, dao.sector_size, dao.index1, dao.end_of_track
                    );
                    return Ok(dao);
                }
                Chunk::End => return Err(NrgError::PayloadNotFound),
                other => debug!("Ignoring {} chunk", other.tag()),
            }
        }
    }

    /// Decode every chunk up to and including `END!`.
    pub fn read_chunks(&mut self) -> Result<Vec<Chunk>> {
        let mut chunks = Vec::new();
        loop {
            let chunk = self.read_chunk()?;
            let done = chunk == Chunk::End;
            chunks.push(chunk);
            if done {
                return Ok(chunks);
            }
        }
    }

    /// Get a mutable reference to the underlying reader.
    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}
