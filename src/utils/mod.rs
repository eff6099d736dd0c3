//! Utility functions shared by the library and the CLI.
//!
//! ## Modules
//!
//! - [`app_data`] - Configuration and the application data directory
//! - [`encoding`] - Little-endian integer helpers for the file format
//! - [`stages`] - Stage names and per-stage database file names
//!
//! ## Key Functions
//!
//! ```no_run
//! use ccml::utils::{method_file_path, stage_name, AppConfig};
//!
//! let config = AppConfig::load().unwrap();
//! let dir = config.effective_methods_dir().unwrap();
//!
//! // methods-8.ccml holds the Major methods
//! let path = method_file_path(&dir, 8).unwrap();
//! assert_eq!(stage_name(8), Some("Major"));
//! ```

pub mod app_data;
pub mod encoding;
pub mod stages;

pub use app_data::*;
pub use encoding::*;
pub use stages::*;
