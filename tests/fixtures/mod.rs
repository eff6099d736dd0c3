//! Shared helpers for building method databases in tests.
#![allow(dead_code)]

use ccml::index::DatabaseWriter;
use ccml::ringing::{parse_place_notation, BellBitmask, Method};
use std::cell::Cell;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub fn method(
    title: &str,
    stage: u8,
    notation: &str,
    lead_count: u16,
    hunt_bells: BellBitmask,
) -> Method {
    Method {
        title: title.as_bytes().to_vec(),
        stage,
        notation: parse_place_notation(notation).unwrap(),
        lead_count,
        hunt_bells,
    }
}

/// Minor methods that all come round, deliberately unsorted
pub fn minor_methods() -> Vec<Method> {
    vec![
        method("Plain Bob", 6, "x16x16x16,12", 5, 0b1),
        method("Cambridge Surprise", 6, "x36x14x12x36x14x56,12", 5, 0b1),
        method("Kent Treble Bob", 6, "34x34.16x12x16x12x16,16", 5, 0b1),
        method("Double Court", 6, "x14x16x16,16", 5, 0b1),
        method("Bastow Little Bob", 6, "x12,16", 5, 0b1),
        method("Original", 6, "x16", 6, 0b0),
        method("London Surprise", 6, "36x36.14x12x36.14x14.36,12", 5, 0b1),
        method("Cambridge Delight", 6, "x36x14x56x36x14x56,12", 5, 0b1),
    ]
}

/// Many titles sharing a prefix, for paging
pub fn cambridge_family(count: usize) -> Vec<Method> {
    (0..count)
        .map(|i| method(&format!("Cambridge {}", (b'A' + i as u8) as char), 6, "x16", 6, 0))
        .collect()
}

pub fn database_bytes(stage: u8, depth: u8, methods: &[Method]) -> Vec<u8> {
    let mut out = Vec::new();
    DatabaseWriter::new(stage, depth).write(&mut out, methods).unwrap();
    out
}

pub fn write_database(dir: &Path, name: &str, stage: u8, depth: u8, methods: &[Method]) -> PathBuf {
    let path = dir.join(name);
    DatabaseWriter::new(stage, depth).write_file(&path, methods).unwrap();
    path
}

/// A depth-0 file holding one record titled "AB", built byte by byte.
///
/// The record starts at offset 12 and the file is 28 bytes long.
pub fn hand_built_ab() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"CCML");
    bytes.extend_from_slice(&[0x02, 6, 0, 0]);
    bytes.extend_from_slice(&12u32.to_le_bytes());
    bytes.extend_from_slice(&[
        14, 0, // record length
        2, b'A', b'B', 0, // title
        2, 0, 0x00, 0x00, 0x21, 0x00, // two changes: x, 16
        5, 0, // lead count
        1, 0, // hunt bells
    ]);
    bytes
}

/// In-memory source that remembers the largest single read it served.
pub struct CountingSource {
    inner: Cursor<Vec<u8>>,
    largest_read: Rc<Cell<usize>>,
}

impl CountingSource {
    pub fn new(bytes: Vec<u8>) -> (Self, Rc<Cell<usize>>) {
        let largest_read = Rc::new(Cell::new(0));
        let source = Self {
            inner: Cursor::new(bytes),
            largest_read: Rc::clone(&largest_read),
        };
        (source, largest_read)
    }
}

impl Read for CountingSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.largest_read.set(self.largest_read.get().max(buf.len()));
        self.inner.read(buf)
    }
}

impl Seek for CountingSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}
