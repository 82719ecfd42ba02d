use anyhow::{Context, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Read, Seek, Write};
use std::path::Path;

use crate::io::{LocalFileReader, copy_range};

use super::error::NrgError;
use super::parser::NrgParser;
use super::structures::{Chunk, ContainerFormat, ExtractionPlan};

/// Summary of a container's chunk stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkListing {
    pub format: ContainerFormat,
    pub first_chunk_offset: u64,
    /// Every chunk in stream order, ending with [`Chunk::End`].
    pub chunks: Vec<Chunk>,
}

/// NRG payload extractor
pub struct NrgExtractor<R> {
    parser: NrgParser<R>,
}

impl NrgExtractor<LocalFileReader> {
    /// Open a container on the local filesystem.
    pub fn open(path: &Path) -> Result<Self> {
        let reader = LocalFileReader::open(path).context("failed to open source file")?;
        debug!("Opened {} ({} bytes)", path.display(), reader.size());
        Ok(Self::new(reader))
    }
}

impl<R: Read + Seek> NrgExtractor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            parser: NrgParser::new(reader),
        }
    }

    /// List the container format and all chunks
    pub fn list_chunks(&mut self) -> Result<ChunkListing> {
        let (format, first_chunk_offset) = self
            .parser
            .seek_to_chunks()
            .context("failed parsing source file")?;
        let chunks = self
            .parser
            .read_chunks()
            .context("failed parsing source file")?;

        Ok(ChunkListing {
            format,
            first_chunk_offset,
            chunks,
        })
    }

    /// Locate the payload byte range
    pub fn plan(&mut self) -> Result<ExtractionPlan> {
        let plan = self
            .locate()
            .context("failed parsing source file")?;
        info!(
            "Payload spans [{}, {}) ({} bytes)",
            plan.start,
            plan.end,
            plan.len()
        );
        Ok(plan)
    }

    fn locate(&mut self) -> Result<ExtractionPlan, NrgError> {
        self.parser.seek_to_chunks()?;
        let dao = self.parser.find_payload()?;
        ExtractionPlan::try_from(&dao)
    }

    /// Copy the payload into `writer`
    pub fn extract_to_writer<W: Write>(&mut self, writer: &mut W) -> Result<ExtractionPlan> {
        let plan = self.plan()?;
        self.copy(&plan, writer)?;
        Ok(plan)
    }

    /// Extract the payload to disk.
    ///
    /// The target is only created once the payload has been located. If the
    /// copy fails midway the partial target is left in place.
    pub fn extract_to_file(&mut self, output_path: &Path) -> Result<ExtractionPlan> {
        let plan = self.plan()?;

        let file = File::create(output_path)
            .map_err(|source| NrgError::Create {
                path: output_path.to_path_buf(),
                source,
            })
            .context("failed to create target file")?;
        let mut writer = BufWriter::new(file);
        self.copy(&plan, &mut writer)?;

        Ok(plan)
    }

    fn copy<W: Write>(&mut self, plan: &ExtractionPlan, writer: &mut W) -> Result<()> {
        copy_range(self.parser.reader_mut(), writer, plan.start, plan.len())
            .context("failed copying payload")?;
        Ok(())
    }
}

/// Extract the payload of the container at `source` into a new file at `target`.
pub fn convert(source: &Path, target: &Path) -> Result<ExtractionPlan> {
    NrgExtractor::open(source)?.extract_to_file(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nrg::structures::{DaoInfo, SessionInfo};
    use byteorder::{BigEndian, WriteBytesExt};
    use std::io::Cursor;

    fn container(chunks: &[Chunk]) -> Vec<u8> {
        let mut buf = vec![0u8; 16];
        buf.extend((0..64u8).cycle().take(256));
        let offset = buf.len() as u32;
        for chunk in chunks {
            chunk.write_to(&mut buf, 0).unwrap();
        }
        buf.extend_from_slice(b"NERO");
        buf.write_u32::<BigEndian>(offset).unwrap();
        buf
    }

    #[test]
    fn extracts_to_writer() {
        let dao = DaoInfo {
            index1: 16,
            end_of_track: 16 + 128,
            ..Default::default()
        };
        let image = container(&[Chunk::Daox(dao), Chunk::End]);
        let expected = image[16..144].to_vec();

        let mut extractor = NrgExtractor::new(Cursor::new(image));
        let mut out = Vec::new();
        let plan = extractor.extract_to_writer(&mut out).unwrap();
        assert_eq!(plan, ExtractionPlan { start: 16, end: 144 });
        assert_eq!(out, expected);
    }

    #[test]
    fn lists_chunks_with_format() {
        let chunks = [
            Chunk::Sinf(SessionInfo { tracks: 1 }),
            Chunk::Daox(DaoInfo::default()),
            Chunk::End,
        ];
        let mut extractor = NrgExtractor::new(Cursor::new(container(&chunks)));
        let listing = extractor.list_chunks().unwrap();
        assert_eq!(listing.format, ContainerFormat::V1);
        assert_eq!(listing.first_chunk_offset, 16 + 256);
        assert_eq!(listing.chunks, chunks.to_vec());
    }

    #[test]
    fn stage_context_wraps_kind() {
        let mut extractor = NrgExtractor::new(Cursor::new(container(&[Chunk::End])));
        let err = extractor.plan().unwrap_err();
        assert_eq!(err.to_string(), "failed parsing source file");
        assert!(matches!(
            err.downcast_ref::<NrgError>(),
            Some(NrgError::PayloadNotFound)
        ));
    }
}
