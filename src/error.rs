use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while opening or reading a method database.
///
/// Every failure is returned to the immediate caller; nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    // === Open failures ===
    /// The database file could not be opened or mapped.
    #[error("cannot open method file '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header does not start with the format's magic word.
    #[error("not a method file: bad magic {found:02x?}")]
    BadMagic { found: [u8; 4] },

    /// The header carries a format version this reader does not understand.
    #[error("unsupported method file version {found:#04x}")]
    UnsupportedVersion { found: u8 },

    /// The file ended before a complete header could be read.
    #[error("method file header truncated: got {actual} of 8 bytes")]
    ShortHeader { actual: usize },

    /// The declared pointer depth needs a table that cannot fit in the file.
    #[error("pointer table of depth {depth} does not fit in a {file_size} byte file")]
    PointerTableTooLarge { depth: u8, file_size: u64 },

    // === Record failures ===
    /// A record's declared sizes are out of bounds or its payload is too short.
    #[error("corrupt record at offset {offset}: {detail}")]
    CorruptRecord { offset: u64, detail: String },

    /// A read returned fewer bytes than requested.
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    // === Reader state ===
    /// A positioned operation was attempted with no file open.
    #[error("no method file is open")]
    NotOpen,

    /// The byte source itself failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Encoding ===
    /// A method cannot be represented in the on-disk record format.
    #[error("cannot encode method: {detail}")]
    Unencodable { detail: String },
}

impl Error {
    pub(crate) fn corrupt(offset: u64, detail: impl Into<String>) -> Self {
        Error::CorruptRecord {
            offset,
            detail: detail.into(),
        }
    }

    /// Whether this error belongs to the open-failure class.
    pub fn is_open_failure(&self) -> bool {
        matches!(
            self,
            Error::Open { .. }
                | Error::BadMagic { .. }
                | Error::UnsupportedVersion { .. }
                | Error::ShortHeader { .. }
                | Error::PointerTableTooLarge { .. }
        )
    }

    /// Whether this error means the file contents cannot be trusted.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Error::CorruptRecord { .. })
    }
}

/// Result type alias for method database operations.
pub type Result<T> = std::result::Result<T, Error>;
