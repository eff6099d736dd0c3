use crate::error::{Error, Result};
use crate::index::addressing::subtree_slots;
use serde::{Deserialize, Serialize};

/// Magic word at the start of every method file
pub const MAGIC: [u8; 4] = *b"CCML";

/// The only format version this reader understands
pub const FORMAT_VERSION: u8 = 0x02;

/// Size of the fixed header in bytes
pub const HEADER_SIZE: u64 = 8;

/// Width of one pointer-table entry in bytes
pub const POINTER_SIZE: u64 = 4;

/// Declared record lengths must stay below this
pub const MAX_RECORD_LENGTH: usize = 1024;

/// Width of the length prefix in front of every record
pub const LENGTH_PREFIX_SIZE: u64 = 2;

/// File header (8 bytes):
/// - magic (4 bytes)
/// - version (1 byte)
/// - stage (1 byte)
/// - padding (1 byte)
/// - pointer depth (1 byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    pub stage: u8,
    pub pointer_depth: u8,
}

impl FileHeader {
    pub fn new(stage: u8, pointer_depth: u8) -> Self {
        Self {
            stage,
            pointer_depth,
        }
    }

    /// Validate and decode the first bytes of a file.
    ///
    /// `bytes` may be shorter than the header; that is reported as a short
    /// header rather than a panic.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE as usize {
            return Err(Error::ShortHeader {
                actual: bytes.len(),
            });
        }
        let mut found = [0u8; 4];
        found.copy_from_slice(&bytes[0..4]);
        if found != MAGIC {
            return Err(Error::BadMagic { found });
        }
        if bytes[4] != FORMAT_VERSION {
            return Err(Error::UnsupportedVersion { found: bytes[4] });
        }
        Ok(Self {
            stage: bytes[5],
            pointer_depth: bytes[7],
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE as usize] {
        [
            MAGIC[0],
            MAGIC[1],
            MAGIC[2],
            MAGIC[3],
            FORMAT_VERSION,
            self.stage,
            0,
            self.pointer_depth,
        ]
    }

    /// Number of entries in the pointer table
    pub fn pointer_slots(&self) -> u64 {
        subtree_slots(u32::from(self.pointer_depth))
    }

    /// File offset of the pointer-table entry for `slot`
    pub fn pointer_offset(&self, slot: u64) -> u64 {
        HEADER_SIZE.saturating_add(POINTER_SIZE.saturating_mul(slot))
    }

    /// Offset of the first record, just past the pointer table
    pub fn records_start(&self) -> u64 {
        self.pointer_offset(self.pointer_slots())
    }
}

/// Position, stage and title of a record, without its notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Offset of the record's length prefix
    pub offset: u64,
    pub stage: u8,
    /// Raw title without its terminator
    pub title: Vec<u8>,
}

impl RecordSummary {
    pub fn display_title(&self) -> String {
        crate::charset::display_title(&self.title)
    }
}
