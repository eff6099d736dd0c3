//! The method database file format.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  8 bytes: "CCML", version, stage, pad, depth
//! │    header    │
//! ├──────────────┤  slots(depth) little-endian u32 offsets,
//! │ pointer table│  addressed by title prefix (see [`addressing`])
//! ├──────────────┤
//! │   records    │  length-prefixed, sorted by canonical title
//! └──────────────┘
//! ```
//!
//! A search jumps through the pointer table to the first record that could
//! match and scans forward from there, so only a handful of records are
//! touched per lookup and the file is never loaded whole.

pub mod addressing;
pub mod reader;
pub mod record;
pub mod source;
pub mod types;
pub mod writer;

pub use addressing::{address_of, subtree_slots};
pub use reader::{MethodReader, SearchPager};
pub use record::{decode_record, encode_record};
pub use source::{map_file, ByteSource, MappedFile};
pub use types::*;
pub use writer::{suggested_depth, DatabaseWriter};
