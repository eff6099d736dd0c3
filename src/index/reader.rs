use crate::charset::{compare_search, CompareResult};
use crate::error::{Error, Result};
use crate::index::addressing::address_of;
use crate::index::record::{check_length, decode_payload};
use crate::index::source::{map_file, read_exact_at, ByteSource, MappedFile};
use crate::index::types::*;
use crate::ringing::{Method, MAX_BELLS, MAX_TITLE_LENGTH};
use std::path::Path;
use tracing::{debug, warn};

/// An open database: the source plus what the header told us.
struct OpenFile<S> {
    source: S,
    header: FileHeader,
    size: u64,
}

impl<S: ByteSource> OpenFile<S> {
    fn start(mut source: S) -> Result<Self> {
        let mut raw = [0u8; HEADER_SIZE as usize];
        let actual = source.read_bytes(&mut raw, Some(0))?;
        let header = FileHeader::parse(&raw[..actual])?;
        let size = source.size()?;
        if header.records_start() > size {
            return Err(Error::PointerTableTooLarge {
                depth: header.pointer_depth,
                file_size: size,
            });
        }
        source.seek_to(header.records_start())?;
        Ok(Self {
            source,
            header,
            size,
        })
    }

    fn end_of_file(&mut self) -> Result<bool> {
        Ok(self.source.tell()? >= self.size)
    }

    /// Length prefix of the record at the cursor, checked against the
    /// ceiling and the end of the file before any payload byte is read.
    fn read_length(&mut self, start: u64) -> Result<usize> {
        let mut raw = [0u8; LENGTH_PREFIX_SIZE as usize];
        read_exact_at(&mut self.source, &mut raw, None)?;
        let length = u16::from_le_bytes(raw) as usize;
        check_length(length, start)?;
        if start + LENGTH_PREFIX_SIZE + length as u64 > self.size {
            return Err(Error::corrupt(
                start,
                format!("record of {length} bytes runs past the end of the file"),
            ));
        }
        Ok(length)
    }

    fn read_summary(&mut self) -> Result<RecordSummary> {
        let start = self.source.tell()?;
        let length = self.read_length(start)?;

        let mut raw = [0u8; 1];
        read_exact_at(&mut self.source, &mut raw, None)?;
        let title_len = raw[0] as usize;
        if length <= 1 + (title_len + 1) {
            return Err(Error::corrupt(
                start,
                format!("record of {length} bytes cannot hold a {title_len} byte title"),
            ));
        }
        if title_len + 1 > MAX_TITLE_LENGTH {
            return Err(Error::corrupt(
                start,
                format!("title of {} bytes exceeds {MAX_TITLE_LENGTH}", title_len + 1),
            ));
        }
        let mut title = [0u8; MAX_TITLE_LENGTH];
        read_exact_at(&mut self.source, &mut title[..title_len + 1], None)?;
        if title[title_len] != 0 {
            return Err(Error::corrupt(start, "title is not terminated"));
        }

        self.source
            .seek_to(start + LENGTH_PREFIX_SIZE + length as u64)?;
        Ok(RecordSummary {
            offset: start,
            stage: self.header.stage,
            title: title[..title_len].to_vec(),
        })
    }

    fn read_method(&mut self) -> Result<Method> {
        let start = self.source.tell()?;
        let stage = self.header.stage;
        if stage == 0 || stage as usize > MAX_BELLS {
            return Err(Error::corrupt(start, format!("header stage {stage} is outside 1..=16")));
        }
        let length = self.read_length(start)?;
        let mut payload = [0u8; MAX_RECORD_LENGTH];
        read_exact_at(&mut self.source, &mut payload[..length], None)?;
        decode_payload(&payload[..length], stage, start)
    }

    fn search(&mut self, key: &[u8]) -> Result<u64> {
        let slot = address_of(key, u32::from(self.header.pointer_depth));
        let pointer_at = self.header.pointer_offset(slot);
        let mut raw = [0u8; POINTER_SIZE as usize];
        read_exact_at(&mut self.source, &mut raw, Some(pointer_at))?;
        let target = u64::from(u32::from_le_bytes(raw));
        if target < self.header.records_start() || target > self.size {
            return Err(Error::corrupt(
                pointer_at,
                format!("pointer for slot {slot} targets {target}, outside the record stream"),
            ));
        }

        self.source.seek_to(target)?;
        let mut landing;
        let mut scanned = 0usize;
        loop {
            if self.end_of_file()? {
                landing = self.size;
                break;
            }
            let summary = self.read_summary()?;
            landing = summary.offset;
            scanned += 1;
            if compare_search(key, &summary.title) != CompareResult::BeforeKey {
                break;
            }
        }
        self.source.seek_to(landing)?;
        debug!(slot, target, scanned, landing, "search landed");
        Ok(landing)
    }
}

/// Reader for a single method database file.
///
/// Holds at most one open source. Opening closes whatever was open before,
/// and any failure during open, or any corrupt record met later, leaves
/// the reader closed.
pub struct MethodReader<S = MappedFile> {
    file: Option<OpenFile<S>>,
}

impl<S> Default for MethodReader<S> {
    fn default() -> Self {
        Self { file: None }
    }
}

impl MethodReader<MappedFile> {
    /// Map the file at `path` and open it.
    pub fn open_path(&mut self, path: &Path) -> Result<()> {
        self.close();
        let source = map_file(path)?;
        self.open(source).inspect(|_| debug!(path = %path.display(), "opened method file"))
    }
}

impl<S: ByteSource> MethodReader<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a reader directly on `source`.
    pub fn from_source(source: S) -> Result<Self> {
        let mut reader = Self::new();
        reader.open(source)?;
        Ok(reader)
    }

    /// Validate the header of `source` and make it the current file.
    ///
    /// The cursor is left at the first record.
    pub fn open(&mut self, source: S) -> Result<()> {
        self.close();
        let file = OpenFile::start(source)?;
        debug!(
            stage = file.header.stage,
            depth = file.header.pointer_depth,
            size = file.size,
            "method file header accepted"
        );
        self.file = Some(file);
        Ok(())
    }

    pub fn close(&mut self) {
        if self.file.take().is_some() {
            debug!("closed method file");
        }
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn header(&self) -> Option<FileHeader> {
        self.file.as_ref().map(|f| f.header)
    }

    fn file(&mut self) -> Result<&mut OpenFile<S>> {
        self.file.as_mut().ok_or(Error::NotOpen)
    }

    /// Close on corruption so nothing else is read from a bad file.
    fn guard<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            if err.is_corrupt() {
                warn!(%err, "closing method file");
                self.close();
            }
        }
        result
    }

    pub fn tell(&mut self) -> Result<u64> {
        Ok(self.file()?.source.tell()?)
    }

    pub fn seek(&mut self, pos: u64) -> Result<()> {
        Ok(self.file()?.source.seek_to(pos)?)
    }

    pub fn size(&mut self) -> Result<u64> {
        Ok(self.file()?.size)
    }

    pub fn end_of_file(&mut self) -> Result<bool> {
        self.file()?.end_of_file()
    }

    /// Read the position, stage and title of the record at the cursor and
    /// move past the whole record.
    pub fn read_summary(&mut self) -> Result<RecordSummary> {
        let result = self.file()?.read_summary();
        self.guard(result)
    }

    /// Decode the record at the cursor in full.
    pub fn read_method(&mut self) -> Result<Method> {
        let result = self.file()?.read_method();
        self.guard(result)
    }

    pub fn read_method_at(&mut self, pos: u64) -> Result<Method> {
        self.seek(pos)?;
        self.read_method()
    }

    /// Find the first record whose title does not sort before `key`.
    ///
    /// Jumps through the pointer table to the slot for `key`, then scans
    /// forward record by record. Returns the landing offset (the file size
    /// when every title sorts before `key`) and leaves the cursor there.
    pub fn search(&mut self, key: &[u8]) -> Result<u64> {
        let result = self.file()?.search(key);
        self.guard(result)
    }
}

/// Pages through the records whose titles contain a search key as a prefix.
///
/// Page starts are remembered as they are discovered, so earlier pages can
/// be read again without repeating the search.
#[derive(Debug, Clone)]
pub struct SearchPager {
    key: Vec<u8>,
    page_size: usize,
    page_starts: Vec<u64>,
    complete: bool,
}

impl SearchPager {
    /// Run the search for `key` and prepare to page from where it landed.
    pub fn new<S: ByteSource>(
        reader: &mut MethodReader<S>,
        key: &[u8],
        page_size: usize,
    ) -> Result<Self> {
        let landing = reader.search(key)?;
        Ok(Self {
            key: key.to_vec(),
            page_size: page_size.max(1),
            page_starts: vec![landing],
            complete: false,
        })
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Pages whose start offset is known so far
    pub fn pages_known(&self) -> usize {
        self.page_starts.len()
    }

    /// Whether the last page has been found
    pub fn is_exhausted(&self) -> bool {
        self.complete
    }

    /// Read page `n`, counting from zero. Pages past the last are empty.
    pub fn page<S: ByteSource>(
        &mut self,
        reader: &mut MethodReader<S>,
        n: usize,
    ) -> Result<Vec<RecordSummary>> {
        while n >= self.page_starts.len() {
            if self.complete {
                return Ok(Vec::new());
            }
            let start = self.page_starts[self.page_starts.len() - 1];
            let (_, next) = self.read_page(reader, start)?;
            self.record_next(next);
        }

        let (entries, next) = self.read_page(reader, self.page_starts[n])?;
        if n + 1 == self.page_starts.len() {
            self.record_next(next);
        }
        Ok(entries)
    }

    fn record_next(&mut self, next: Option<u64>) {
        match next {
            Some(pos) => self.page_starts.push(pos),
            None => self.complete = true,
        }
    }

    /// Read one page from `start`; also returns where the following page
    /// begins, if it has any entries.
    fn read_page<S: ByteSource>(
        &self,
        reader: &mut MethodReader<S>,
        start: u64,
    ) -> Result<(Vec<RecordSummary>, Option<u64>)> {
        reader.seek(start)?;
        let mut entries = Vec::with_capacity(self.page_size);
        loop {
            if reader.end_of_file()? {
                return Ok((entries, None));
            }
            let summary = reader.read_summary()?;
            if compare_search(&self.key, &summary.title) != CompareResult::Contained {
                return Ok((entries, None));
            }
            if entries.len() == self.page_size {
                return Ok((entries, Some(summary.offset)));
            }
            entries.push(summary);
        }
    }
}
