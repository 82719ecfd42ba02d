use std::io;
use std::path::PathBuf;

use super::codec::Anchor;
use super::structures::ChunkTag;

/// Errors raised while decoding a NERO container.
#[derive(Debug, thiserror::Error)]
pub enum NrgError {
    #[error("cannot open {}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("cannot create {}", .path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("seek to {offset} from {anchor} is out of range")]
    SeekOutOfRange {
        /// Wide enough for both signed relative and unsigned absolute offsets.
        offset: i128,
        anchor: Anchor,
        source: io::Error,
    },

    #[error("unexpected end of input while reading {needed} bytes")]
    TruncatedInput { needed: u64, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("unable to determine image format")]
    UnknownFormat,

    #[error("unknown chunk ID: {0}")]
    UnknownChunkTag(ChunkTag),

    #[error("chunk {tag} declares {declared} body bytes but its layout needs {required}")]
    MalformedChunk {
        tag: ChunkTag,
        declared: u32,
        required: usize,
    },

    #[error("image format not supported: no DAOX chunk before END!")]
    PayloadNotFound,

    #[error("invalid payload range [{start}, {end})")]
    InvalidPayloadRange { start: i64, end: i64 },
}

impl NrgError {
    /// Classify a read failure, mapping short reads to [`NrgError::TruncatedInput`].
    pub fn read(needed: u64, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::UnexpectedEof {
            Self::TruncatedInput { needed, source }
        } else {
            Self::Io(source)
        }
    }
}

pub type Result<T, E = NrgError> = std::result::Result<T, E>;
