//! # ccml - Change-ringing method lookup
//!
//! Prefix search over compact, sorted binary databases of change-ringing
//! methods, without loading the database into memory.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`charset`] - Folding legacy-charset titles to the 28-symbol search alphabet
//! - [`index`] - The file format: pointer-table addressing, records, reader, writer
//! - [`ringing`] - Rows, place notation and methods
//! - [`check`] - Whole-file consistency checks
//! - [`output`] - Terminal and JSON rendering
//! - [`utils`] - Configuration, stage names, byte helpers
//!
//! ## Quick Start
//!
//! ```no_run
//! use ccml::index::{MethodReader, SearchPager};
//! use std::path::Path;
//!
//! let mut reader = MethodReader::default();
//! reader.open_path(Path::new("methods-8.ccml"))?;
//!
//! let mut pager = SearchPager::new(&mut reader, b"Cambridge", 7)?;
//! for summary in pager.page(&mut reader, 0)? {
//!     let method = reader.read_method_at(summary.offset)?;
//!     println!("{} {}", method.display_title(), method.place_notation());
//! }
//! # Ok::<(), ccml::Error>(())
//! ```
//!
//! ## Search
//!
//! A search costs one pointer read plus a short forward scan:
//!
//! 1. **Jump** - the first `depth` symbols of the key select a pointer-table slot
//! 2. **Scan** - records are read forward until one does not sort before the key

pub mod charset;
pub mod check;
pub mod error;
pub mod index;
pub mod output;
pub mod ringing;
pub mod utils;

pub use error::{Error, Result};
