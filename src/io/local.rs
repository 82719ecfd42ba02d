use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::nrg::NrgError;

/// Local file reader with buffered random access
pub struct LocalFileReader {
    file: BufReader<File>,
    size: u64,
}

impl LocalFileReader {
    pub fn open(path: &Path) -> Result<Self, NrgError> {
        let open_err = |source| NrgError::Open {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(open_err)?;
        let size = file.metadata().map_err(open_err)?.len();
        Ok(Self {
            file: BufReader::new(file),
            size,
        })
    }

    /// Get the total size of the file
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Read for LocalFileReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Seek for LocalFileReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos)
    }
}
