//! Byte sources the reader can sit on.
//!
//! The reader needs positioned reads plus seek/tell/size and nothing else.
//! Any `Read + Seek` value qualifies, so tests run over an in-memory
//! `Cursor<Vec<u8>>` while the CLI maps the file.

use crate::error::{Error, Result};
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

/// Positioned byte access over a database file.
pub trait ByteSource {
    /// Read up to `buf.len()` bytes, starting at `at` or at the current
    /// position when `at` is `None`. Returns how many bytes were read; a
    /// short count means the source ended.
    fn read_bytes(&mut self, buf: &mut [u8], at: Option<u64>) -> io::Result<usize>;

    fn seek_to(&mut self, pos: u64) -> io::Result<()>;

    fn tell(&mut self) -> io::Result<u64>;

    /// Total length of the source in bytes
    fn size(&mut self) -> io::Result<u64>;
}

impl<T: Read + Seek> ByteSource for T {
    fn read_bytes(&mut self, buf: &mut [u8], at: Option<u64>) -> io::Result<usize> {
        if let Some(pos) = at {
            self.seek(SeekFrom::Start(pos))?;
        }
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        self.seek(SeekFrom::Start(pos)).map(|_| ())
    }

    fn tell(&mut self) -> io::Result<u64> {
        self.stream_position()
    }

    fn size(&mut self) -> io::Result<u64> {
        let pos = self.stream_position()?;
        let end = self.seek(SeekFrom::End(0))?;
        self.seek(SeekFrom::Start(pos))?;
        Ok(end)
    }
}

/// A memory-mapped database file
pub type MappedFile = Cursor<Mmap>;

/// Map a database file read-only.
pub fn map_file(path: &Path) -> Result<MappedFile> {
    let open_error = |source| Error::Open {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(open_error)?;
    // SAFETY: the map is read-only and method files are never written in place
    let mmap = unsafe { Mmap::map(&file) }.map_err(open_error)?;
    Ok(Cursor::new(mmap))
}

/// Fill `buf` completely or fail with [`Error::ShortRead`].
pub(crate) fn read_exact_at<S: ByteSource + ?Sized>(
    source: &mut S,
    buf: &mut [u8],
    at: Option<u64>,
) -> Result<()> {
    let actual = source.read_bytes(buf, at)?;
    if actual != buf.len() {
        return Err(Error::ShortRead {
            expected: buf.len(),
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_source() {
        let mut source = Cursor::new(b"0123456789".to_vec());
        assert_eq!(source.size().unwrap(), 10);

        let mut buf = [0u8; 3];
        assert_eq!(source.read_bytes(&mut buf, Some(4)).unwrap(), 3);
        assert_eq!(&buf, b"456");
        assert_eq!(source.tell().unwrap(), 7);

        assert_eq!(source.read_bytes(&mut buf, None).unwrap(), 3);
        assert_eq!(&buf, b"789");
        assert_eq!(source.read_bytes(&mut buf, None).unwrap(), 0);
    }

    #[test]
    fn test_size_keeps_position() {
        let mut source = Cursor::new(vec![0u8; 32]);
        source.seek_to(5).unwrap();
        assert_eq!(source.size().unwrap(), 32);
        assert_eq!(source.tell().unwrap(), 5);
    }

    #[test]
    fn test_read_exact_at_short() {
        let mut source = Cursor::new(b"abc".to_vec());
        let mut buf = [0u8; 4];
        let err = read_exact_at(&mut source, &mut buf, Some(1)).unwrap_err();
        assert!(matches!(err, Error::ShortRead { expected: 4, actual: 2 }));
    }

    #[test]
    fn test_map_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = map_file(&dir.path().join("methods-6.ccml")).unwrap_err();
        assert!(err.is_open_failure());
    }
}
