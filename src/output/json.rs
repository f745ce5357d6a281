//! JSON output formatter for duplicate scan reports.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "hash": "9f86d081884c7d65...",
//!       "size": 1024,
//!       "files": ["/wads/a.wad", "/wads/b.wad"]
//!     }
//!   ],
//!   "copies": [
//!     { "sequence": 1, "source": "/wads/c.wad", "destination": "/out/000001_c.wad" }
//!   ],
//!   "errors": ["Failed to hash /wads/locked.wad: Permission denied: /wads/locked.wad"],
//!   "summary": { "total_files": 3, "duplicate_groups": 1, "duration": 12 }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{CopiedFile, DuplicateGroup, Report, ScanSummary};

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// SHA-256 digest as hexadecimal string (64 characters)
    pub hash: String,
    /// File size in bytes
    pub size: u64,
    /// Member paths in traversal order
    pub files: Vec<String>,
}

impl JsonDuplicateGroup {
    /// Create a JSON duplicate group from a DuplicateGroup.
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            hash: group.digest.clone(),
            size: group.size,
            files: group
                .files
                .iter()
                .map(|f| f.path.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// Duplicate groups in report order
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Files written to the destination
    pub copies: &'a [CopiedFile],
    /// Per-file failures, rendered as report lines
    pub errors: Vec<String>,
    /// Scan summary statistics
    pub summary: &'a ScanSummary,
}

impl<'a> JsonOutput<'a> {
    /// Create a JSON view of a report.
    #[must_use]
    pub fn new(report: &'a Report) -> Self {
        Self {
            duplicates: report
                .groups()
                .map(JsonDuplicateGroup::from_duplicate_group)
                .collect(),
            copies: report.copies(),
            errors: report.errors().flat_map(|e| e.lines()).collect(),
            summary: report.summary(),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
