//! Size and digest indexes used to narrow files down to duplicate groups.
//!
//! # Overview
//!
//! Size grouping is the first phase of duplicate detection: files with
//! different byte lengths can never be identical, so only sizes shared by
//! two or more files are worth hashing. The [`HashIndex`] then buckets the
//! hashed files by digest; buckets with two or more members become
//! [`DuplicateGroup`]s.
//!
//! Both indexes iterate in a fixed order (ascending size, ascending digest)
//! and keep members in insertion order, so "the first member" of a bucket is
//! the first one the walk produced.
//!
//! # Example
//!
//! ```
//! use waddup::scanner::FileRecord;
//! use waddup::duplicates::SizeIndex;
//! use std::path::PathBuf;
//!
//! let mut index = SizeIndex::new();
//! index.insert(FileRecord::new(PathBuf::from("/a.wad"), 1024));
//! index.insert(FileRecord::new(PathBuf::from("/b.wad"), 1024));
//! index.insert(FileRecord::new(PathBuf::from("/c.wad"), 2048));
//!
//! assert_eq!(index.total_files(), 3);
//! assert_eq!(index.unique().count(), 1);
//! assert_eq!(index.files_to_hash(), 2);
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::scanner::FileRecord;

/// Files bucketed by byte length.
#[derive(Debug, Clone, Default)]
pub struct SizeIndex {
    buckets: BTreeMap<u64, Vec<FileRecord>>,
}

impl SizeIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the bucket for its size.
    pub fn insert(&mut self, file: FileRecord) {
        self.buckets.entry(file.size).or_default().push(file);
    }

    /// Check if no files have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of files across all buckets.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Total bytes across all buckets.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.buckets
            .iter()
            .map(|(size, files)| size * files.len() as u64)
            .sum()
    }

    /// Files whose size no other file shares.
    pub fn unique(&self) -> impl Iterator<Item = &FileRecord> {
        self.buckets
            .values()
            .filter(|files| files.len() == 1)
            .flat_map(|files| files.iter())
    }

    /// Buckets that may contain duplicates (2+ files).
    pub fn candidates(&self) -> impl Iterator<Item = (u64, &[FileRecord])> {
        self.buckets
            .iter()
            .filter(|(_, files)| files.len() > 1)
            .map(|(size, files)| (*size, files.as_slice()))
    }

    /// Number of files that need hashing.
    #[must_use]
    pub fn files_to_hash(&self) -> usize {
        self.candidates().map(|(_, files)| files.len()).sum()
    }

    /// Split into (size-unique files, files requiring a digest), both in
    /// index order.
    #[must_use]
    pub fn into_partition(self) -> (Vec<FileRecord>, Vec<FileRecord>) {
        let mut unique = Vec::new();
        let mut candidates = Vec::new();

        for (_, mut files) in self.buckets {
            if files.len() == 1 {
                unique.append(&mut files);
            } else {
                candidates.append(&mut files);
            }
        }

        (unique, candidates)
    }
}

/// Hashed files bucketed by content digest.
#[derive(Debug, Clone, Default)]
pub struct HashIndex {
    buckets: BTreeMap<String, Vec<FileRecord>>,
}

impl HashIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a file under the digest computed for it.
    pub fn insert(&mut self, digest: String, file: FileRecord) {
        self.buckets.entry(digest).or_default().push(file);
    }

    /// Number of distinct digests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if nothing has been hashed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Consume the index, keeping only buckets with two or more members.
    #[must_use]
    pub fn into_duplicate_groups(self) -> Vec<DuplicateGroup> {
        self.buckets
            .into_iter()
            .filter(|(_, files)| files.len() > 1)
            .map(|(digest, files)| DuplicateGroup::new(digest, files))
            .collect()
    }
}

/// Confirmed group of content-identical files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// SHA-256 digest shared by every member (64 hex characters)
    pub digest: String,
    /// File size in bytes (shared by all members)
    pub size: u64,
    /// Members in traversal order
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(digest: String, files: Vec<FileRecord>) -> Self {
        let size = files.first().map_or(0, |f| f.size);
        Self {
            digest,
            size,
            files,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The member kept when materializing: first in traversal order.
    #[must_use]
    pub fn representative(&self) -> Option<&FileRecord> {
        self.files.first()
    }

    /// Number of redundant copies (all members minus one).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Bytes that would be freed by keeping one member.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }
}
