//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Sorted recursive directory walking using walkdir
//! - Pluggable path filters (extension, hidden files)
//! - Streaming SHA-256 content hashing
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: SHA-256 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use waddup::scanner::{extension_filter, Walker};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/games/wads")).with_filter(extension_filter("wad"));
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

// Re-export main types
pub use hasher::{hash_to_hex, Hash, Hasher, CHUNK_SIZE};
pub use walker::Walker;

/// One regular file observed during traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Path to the file, as produced by the walk
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileRecord {
    /// Create a new FileRecord.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Predicate deciding whether a discovered file takes part in the scan.
pub type PathFilter = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Accept files whose extension matches `extension` (case-insensitive).
///
/// A leading dot is ignored, so `"wad"` and `".WAD"` are equivalent.
///
/// # Example
///
/// ```
/// use waddup::scanner::extension_filter;
/// use std::path::Path;
///
/// let only_wads = extension_filter("wad");
/// assert!(only_wads(Path::new("maps/DOOM2.WAD")));
/// assert!(!only_wads(Path::new("maps/readme.txt")));
/// ```
#[must_use]
pub fn extension_filter(extension: &str) -> PathFilter {
    let wanted = extension.trim_start_matches('.').to_lowercase();
    Arc::new(move |path: &Path| {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.to_lowercase() == wanted)
    })
}

/// Reject files whose name, or any parent directory name below the scan
/// root, starts with a dot.
#[must_use]
pub fn skip_hidden_filter(root: &Path) -> PathFilter {
    let root = root.to_path_buf();
    Arc::new(move |path: &Path| {
        let relative = path.strip_prefix(&root).unwrap_or(path);
        !relative
            .components()
            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
    })
}

/// Combine filters; a path must pass all of them.
#[must_use]
pub fn all_of(filters: Vec<PathFilter>) -> PathFilter {
    Arc::new(move |path: &Path| filters.iter().all(|f| f(path)))
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// A directory loop was detected while following links.
    #[error("Filesystem loop at {0}")]
    Loop(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error for `path`.
    pub(crate) fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::Loop(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    pub(crate) fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
