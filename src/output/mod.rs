//! Output formatters for duplicate scan reports.
//!
//! - Text: the report lines, as printed by both binaries by default
//! - JSON: for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use waddup::duplicates::{Finder, FinderConfig};
//! use waddup::output::{JsonOutput, TextOutput, NO_DUPLICATES};
//! use std::path::Path;
//!
//! let report = Finder::new(Path::new("."), None, FinderConfig::default())
//!     .unwrap()
//!     .find_duplicates();
//!
//! TextOutput::new(&report, NO_DUPLICATES)
//!     .write_to(&mut std::io::stdout())
//!     .unwrap();
//! println!("{}", JsonOutput::new(&report).to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

// Re-export main types
pub use json::JsonOutput;
pub use text::{TextOutput, NO_DUPLICATES, NO_DUPLICATE_WADS};
