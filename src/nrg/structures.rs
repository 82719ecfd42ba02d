use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::{self, Cursor, Read, Write};

use super::codec::Record;
use super::error::{NrgError, Result};

/// NERO container versions, distinguished by their trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// Images from Nero before 5.5: `NERO` marker, 32-bit chunk offset.
    V1,
    /// Images from Nero 5.5 and later: `NER5` marker, 64-bit chunk offset.
    V2,
}

impl ContainerFormat {
    /// Detection priority order.
    pub const ALL: [ContainerFormat; 2] = [ContainerFormat::V1, ContainerFormat::V2];

    pub fn marker(&self) -> &'static [u8; 4] {
        match self {
            ContainerFormat::V1 => b"NERO",
            ContainerFormat::V2 => b"NER5",
        }
    }

    /// Offset of the marker relative to end of file.
    pub fn trailer_offset(&self) -> i64 {
        match self {
            ContainerFormat::V1 => -8,
            ContainerFormat::V2 => -12,
        }
    }

    /// Width in bytes of the first-chunk offset that ends the file.
    pub fn offset_width(&self) -> usize {
        match self {
            ContainerFormat::V1 => 4,
            ContainerFormat::V2 => 8,
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&String::from_utf8_lossy(self.marker()))
    }
}

/// Four-byte ASCII chunk identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkTag(pub [u8; 4]);

impl ChunkTag {
    pub const CUEX: ChunkTag = ChunkTag(*b"CUEX");
    pub const DAOX: ChunkTag = ChunkTag(*b"DAOX");
    pub const SINF: ChunkTag = ChunkTag(*b"SINF");
    pub const MTYP: ChunkTag = ChunkTag(*b"MTYP");
    pub const END: ChunkTag = ChunkTag(*b"END!");
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkTag({self})")
    }
}

/// Chunk header - 8 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub tag: ChunkTag,
    /// Declared body size, which may exceed the known layout of `tag`.
    pub size: u32,
}

impl Record for ChunkHeader {
    const SIZE: usize = 8;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        let mut tag = [0u8; 4];
        cursor.read_exact(&mut tag)?;

        Ok(Self {
            tag: ChunkTag(tag),
            size: cursor.read_u32::<BigEndian>()?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.tag.0)?;
        writer.write_u32::<BigEndian>(self.size)
    }
}

/// `CUEX` track index entry - 8 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CueIndex {
    pub mode: u8,
    pub track: u8,
    pub index: u8,
    pub padding: u8,
    pub lba: i32,
}

impl Record for CueIndex {
    const SIZE: usize = 8;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);

        Ok(Self {
            mode: cursor.read_u8()?,
            track: cursor.read_u8()?,
            index: cursor.read_u8()?,
            padding: cursor.read_u8()?,
            lba: cursor.read_i32::<BigEndian>()?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(self.mode)?;
        writer.write_u8(self.track)?;
        writer.write_u8(self.index)?;
        writer.write_u8(self.padding)?;
        writer.write_i32::<BigEndian>(self.lba)
    }
}

/// `DAOX` disc-at-once information - 64 bytes
///
/// Carries the byte range of the track data inside the container:
/// `index1` is where user data starts and `end_of_track` is one past its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DaoInfo {
    pub size: u32,
    pub upc: [u8; 13],
    pub padding: u8,
    pub toc_type: u16,
    pub first_track: u8,
    pub last_track: u8,
    pub isrc: [u8; 12],
    pub sector_size: u16,
    pub mode: u16,
    pub unknown: u16,
    pub index0: i64,
    pub index1: i64,
    pub end_of_track: i64,
}

impl Record for DaoInfo {
    const SIZE: usize = 64;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);

        let size = cursor.read_u32::<BigEndian>()?;
        let mut upc = [0u8; 13];
        cursor.read_exact(&mut upc)?;
        let padding = cursor.read_u8()?;
        let toc_type = cursor.read_u16::<BigEndian>()?;
        let first_track = cursor.read_u8()?;
        let last_track = cursor.read_u8()?;
        let mut isrc = [0u8; 12];
        cursor.read_exact(&mut isrc)?;

        Ok(Self {
            size,
            upc,
            padding,
            toc_type,
            first_track,
            last_track,
            isrc,
            sector_size: cursor.read_u16::<BigEndian>()?,
            mode: cursor.read_u16::<BigEndian>()?,
            unknown: cursor.read_u16::<BigEndian>()?,
            index0: cursor.read_i64::<BigEndian>()?,
            index1: cursor.read_i64::<BigEndian>()?,
            end_of_track: cursor.read_i64::<BigEndian>()?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<BigEndian>(self.size)?;
        writer.write_all(&self.upc)?;
        writer.write_u8(self.padding)?;
        writer.write_u16::<BigEndian>(self.toc_type)?;
        writer.write_u8(self.first_track)?;
        writer.write_u8(self.last_track)?;
        writer.write_all(&self.isrc)?;
        writer.write_u16::<BigEndian>(self.sector_size)?;
        writer.write_u16::<BigEndian>(self.mode)?;
        writer.write_u16::<BigEndian>(self.unknown)?;
        writer.write_i64::<BigEndian>(self.index0)?;
        writer.write_i64::<BigEndian>(self.index1)?;
        writer.write_i64::<BigEndian>(self.end_of_track)
    }
}

/// `SINF` session information - 4 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionInfo {
    pub tracks: i32,
}

impl Record for SessionInfo {
    const SIZE: usize = 4;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        Ok(Self {
            tracks: cursor.read_i32::<BigEndian>()?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_i32::<BigEndian>(self.tracks)
    }
}

/// `MTYP` media type - 4 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MediaType {
    pub value: i32,
}

impl Record for MediaType {
    const SIZE: usize = 4;

    fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        Ok(Self {
            value: cursor.read_i32::<BigEndian>()?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_i32::<BigEndian>(self.value)
    }
}

/// A decoded chunk body, keyed by its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chunk {
    Cuex(CueIndex),
    Daox(DaoInfo),
    Sinf(SessionInfo),
    Mtyp(MediaType),
    End,
}

impl Chunk {
    pub fn tag(&self) -> ChunkTag {
        match self {
            Chunk::Cuex(_) => ChunkTag::CUEX,
            Chunk::Daox(_) => ChunkTag::DAOX,
            Chunk::Sinf(_) => ChunkTag::SINF,
            Chunk::Mtyp(_) => ChunkTag::MTYP,
            Chunk::End => ChunkTag::END,
        }
    }

    /// Known layout width of the body for `tag`, or `None` for unknown tags.
    pub fn body_size(tag: ChunkTag) -> Option<usize> {
        match tag {
            ChunkTag::CUEX => Some(CueIndex::SIZE),
            ChunkTag::DAOX => Some(DaoInfo::SIZE),
            ChunkTag::SINF => Some(SessionInfo::SIZE),
            ChunkTag::MTYP => Some(MediaType::SIZE),
            ChunkTag::END => Some(0),
            _ => None,
        }
    }

    /// Decode the body for `tag` from a buffer of [`Chunk::body_size`] bytes.
    pub fn from_bytes(tag: ChunkTag, data: &[u8]) -> Result<Self> {
        Ok(match tag {
            ChunkTag::CUEX => Chunk::Cuex(CueIndex::from_bytes(data)?),
            ChunkTag::DAOX => Chunk::Daox(DaoInfo::from_bytes(data)?),
            ChunkTag::SINF => Chunk::Sinf(SessionInfo::from_bytes(data)?),
            ChunkTag::MTYP => Chunk::Mtyp(MediaType::from_bytes(data)?),
            ChunkTag::END => Chunk::End,
            _ => return Err(NrgError::UnknownChunkTag(tag)),
        })
    }

    /// Encode header and body, declaring `slack` extra zero bytes after the body.
    ///
    /// Fails with [`io::ErrorKind::InvalidInput`], writing nothing, if body
    /// and slack together exceed the 32-bit size field.
    pub fn write_to<W: Write>(&self, writer: &mut W, slack: u32) -> io::Result<()> {
        let tag = self.tag();
        let body = Chunk::body_size(tag).unwrap_or_default() as u32;
        let size = body.checked_add(slack).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{tag} body of {body} bytes plus {slack} slack overflows u32"),
            )
        })?;
        ChunkHeader { tag, size }.write_to(writer)?;

        match self {
            Chunk::Cuex(c) => c.write_to(writer)?,
            Chunk::Daox(d) => d.write_to(writer)?,
            Chunk::Sinf(s) => s.write_to(writer)?,
            Chunk::Mtyp(m) => m.write_to(writer)?,
            Chunk::End => {}
        }
        io::copy(&mut io::repeat(0).take(u64::from(slack)), writer)?;
        Ok(())
    }
}

/// Byte range of the disc payload inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionPlan {
    pub start: u64,
    pub end: u64,
}

impl ExtractionPlan {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl TryFrom<&DaoInfo> for ExtractionPlan {
    type Error = NrgError;

    fn try_from(dao: &DaoInfo) -> Result<Self> {
        let invalid = || NrgError::InvalidPayloadRange {
            start: dao.index1,
            end: dao.end_of_track,
        };
        let start = u64::try_from(dao.index1).map_err(|_| invalid())?;
        let end = u64::try_from(dao.end_of_track).map_err(|_| invalid())?;
        if end < start {
            return Err(invalid());
        }

        Ok(Self { start, end })
    }
}
