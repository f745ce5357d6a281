//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (Phase 1)
//! - Content hashing of same-size files (Phase 2)
//! - Duplicate group reporting and deduplicated copying
//! - The run [`Report`]

pub mod finder;
pub mod groups;
pub mod report;

pub use finder::{destination_name, Finder, FinderConfig, FinderError, SEQUENCE_WIDTH};
pub use groups::{DuplicateGroup, HashIndex, SizeIndex};
pub use report::{CopiedFile, Report, ReportEntry, ScanSummary};
