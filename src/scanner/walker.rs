//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and collecting [`FileRecord`]s for duplicate detection.
//!
//! # Features
//!
//! - Entries sorted by file name, so the walk order is reproducible
//! - Symlinks to regular files are treated as regular files; directory
//!   symlinks are not descended into
//! - Injectable [`PathFilter`] predicate (e.g. archive files only)
//! - Traversal errors yielded as [`ScanError`] values instead of aborting
//!
//! # Example
//!
//! ```no_run
//! use waddup::scanner::Walker;
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/games/wads"));
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{FileRecord, PathFilter, ScanError};

/// Directory walker for file discovery.
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Optional predicate; files it rejects are skipped silently
    filter: Option<PathFilter>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("filter", &self.filter.as_ref().map(|_| "<filter>"))
            .finish()
    }
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self {
            root: path.to_path_buf(),
            filter: None,
        }
    }

    /// Only yield files accepted by `filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: PathFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Root directory of this walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn accepts(&self, path: &Path) -> bool {
        self.filter.as_ref().is_none_or(|f| f(path))
    }

    /// Walk the directory tree, yielding file records in traversal order.
    ///
    /// Directories, special files and filtered-out paths are skipped.
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(&entry),
                Err(e) => Some(Err(self.convert_walk_error(e))),
            })
    }

    /// Turn a walk entry into a FileRecord if it is a qualifying file.
    fn process_entry(&self, entry: &DirEntry) -> Option<Result<FileRecord, ScanError>> {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            return None;
        }

        let path = entry.path();
        if !self.accepts(path) {
            log::trace!("Skipping filtered file: {}", path.display());
            return None;
        }

        let metadata = if file_type.is_symlink() {
            match std::fs::metadata(path) {
                Ok(m) => m,
                Err(e) => {
                    log::trace!("Skipping dangling symlink {}: {}", path.display(), e);
                    return None;
                }
            }
        } else {
            match entry.metadata() {
                Ok(m) => m,
                Err(e) => return Some(Err(self.convert_walk_error(e))),
            }
        };

        Self::record_for(path, &metadata).map(Ok)
    }

    fn record_for(path: &Path, metadata: &Metadata) -> Option<FileRecord> {
        if metadata.is_file() {
            Some(FileRecord::new(path.to_path_buf(), metadata.len()))
        } else {
            log::trace!("Skipping non-regular file: {}", path.display());
            None
        }
    }

    fn convert_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if error.loop_ancestor().is_some() {
            return ScanError::Loop(path);
        }

        match error.into_io_error() {
            Some(io) => ScanError::from_io(&path, io),
            None => ScanError::Io {
                path,
                source: std::io::Error::other("directory walk failed"),
            },
        }
    }
}
