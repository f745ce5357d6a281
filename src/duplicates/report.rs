//! Scan report: duplicate groups, per-file failures and copy outcomes.
//!
//! A [`Report`] is produced once per run and never mutated afterwards by
//! callers. Entries are kept in the order the run produced them; the
//! human-readable form is obtained with [`Report::lines`].

use std::path::PathBuf;
use std::time::Duration;

use bytesize::ByteSize;
use serde::Serialize;

use super::DuplicateGroup;

/// One item of a report, in the order it was produced.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportEntry {
    /// No qualifying files were found under the source directory.
    NoFiles {
        /// Directory that was scanned
        source: PathBuf,
    },
    /// A confirmed group of identical files.
    Group(DuplicateGroup),
    /// A file could not be hashed and was left out of duplicate detection.
    HashFailed {
        /// File that failed
        path: PathBuf,
        /// Error description
        error: String,
    },
    /// A file could not be copied to the destination.
    CopyFailed {
        /// File being copied
        source: PathBuf,
        /// Intended destination path
        destination: PathBuf,
        /// Error description
        error: String,
    },
    /// Part of the tree could not be read during traversal.
    ScanFailed {
        /// Path the walk failed on
        path: PathBuf,
        /// Error description
        error: String,
    },
}

impl ReportEntry {
    /// Render this entry as one or more report lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::NoFiles { source } => vec![format!("No files found in {}", source.display())],
            Self::Group(group) => {
                let mut lines = Vec::with_capacity(group.len() + 1);
                lines.push(format!(
                    "Found duplicate files with hash {}:",
                    group.digest
                ));
                lines.extend(
                    group
                        .files
                        .iter()
                        .map(|f| format!("  {} ({} bytes)", f.path.display(), f.size)),
                );
                lines
            }
            Self::HashFailed { path, error } => {
                vec![format!("Failed to hash {}: {}", path.display(), error)]
            }
            Self::CopyFailed {
                source,
                destination,
                error,
            } => vec![format!(
                "Failed to copy {} to {}: {}",
                source.display(),
                destination.display(),
                error
            )],
            Self::ScanFailed { path, error } => {
                vec![format!("Failed to scan {}: {}", path.display(), error)]
            }
        }
    }

    /// Whether this entry describes a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::HashFailed { .. } | Self::CopyFailed { .. } | Self::ScanFailed { .. }
        )
    }
}

/// A file successfully written to the destination directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopiedFile {
    /// Sequence number used in the destination name
    pub sequence: u64,
    /// Original file
    pub source: PathBuf,
    /// Where it was written
    pub destination: PathBuf,
}

/// Summary statistics from a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Qualifying files found by the walk
    pub total_files: usize,
    /// Total size of those files in bytes
    pub total_size: u64,
    /// Files that shared their size with another file
    pub files_to_hash: usize,
    /// Files hashed successfully
    pub hashed_files: usize,
    /// Files whose digest could not be computed
    pub failed_hashes: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Redundant files (group members beyond the first)
    pub duplicate_files: usize,
    /// Bytes occupied by redundant files
    pub reclaimable_space: u64,
    /// Copies attempted into the destination
    pub copies_attempted: u64,
    /// Copies that failed
    pub failed_copies: usize,
    /// Wall-clock duration of the run
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl ScanSummary {
    /// Percentage of scanned bytes occupied by redundant copies.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Reclaimable space as a human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Total scanned size as a human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Result of one duplicate-finding run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    entries: Vec<ReportEntry>,
    copies: Vec<CopiedFile>,
    summary: ScanSummary,
}

impl Report {
    pub(crate) fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn record_copy(&mut self, copy: CopiedFile) {
        self.copies.push(copy);
    }

    pub(crate) fn summary_mut(&mut self) -> &mut ScanSummary {
        &mut self.summary
    }

    /// Entries in the order they were produced.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Duplicate groups, in report order.
    pub fn groups(&self) -> impl Iterator<Item = &DuplicateGroup> {
        self.entries.iter().filter_map(|e| match e {
            ReportEntry::Group(g) => Some(g),
            _ => None,
        })
    }

    /// Failure entries, in report order.
    pub fn errors(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| e.is_error())
    }

    /// Files written to the destination, in copy order.
    #[must_use]
    pub fn copies(&self) -> &[CopiedFile] {
        &self.copies
    }

    /// Statistics for the run.
    #[must_use]
    pub fn summary(&self) -> &ScanSummary {
        &self.summary
    }

    /// Check if the report has nothing to say.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Human-readable report lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().flat_map(ReportEntry::lines).collect()
    }
}
