//! Duplicate finder implementation with two-phase detection.
//!
//! # Overview
//!
//! This module orchestrates the duplicate detection pipeline:
//! 1. **Walk** - Collect qualifying files from the source directory
//! 2. **Size grouping** - Bucket files by byte length (see [`crate::duplicates::groups`])
//! 3. **Hashing** - Compute SHA-256 digests of files that share a size
//! 4. **Aggregation** - Report every digest shared by two or more files
//!
//! When a destination directory is configured, the finder also materializes
//! a deduplicated copy of the tree: every size-unique file and the first
//! member of every duplicate group is copied to the destination as
//! `<six-digit sequence>_<file name>`.
//!
//! # Example
//!
//! ```no_run
//! use waddup::duplicates::{Finder, FinderConfig};
//! use waddup::scanner::extension_filter;
//! use std::path::Path;
//!
//! let config = FinderConfig::default().with_filter(extension_filter("wad"));
//! let finder = Finder::new(Path::new("/games/wads"), Some(Path::new("/games/unique")), config)
//!     .expect("invalid directories");
//!
//! let report = finder.find_duplicates();
//! for line in report.lines() {
//!     println!("{}", line);
//! }
//! ```

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use rayon::prelude::*;

use super::report::{CopiedFile, Report, ReportEntry};
use super::{HashIndex, SizeIndex};
use crate::progress::{ProgressCallback, PHASE_HASHING, PHASE_WALKING};
use crate::scanner::{FileRecord, HashError, Hasher, PathFilter, Walker};

/// Width of the zero-padded sequence prefix on copied files.
pub const SEQUENCE_WIDTH: usize = 6;

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Predicate selecting which files take part (all regular files if unset).
    pub filter: Option<PathFilter>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
    /// Number of threads used for hashing. 1 hashes on the calling thread.
    pub io_threads: usize,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("filter", &self.filter.as_ref().map(|_| "<filter>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .field("io_threads", &self.io_threads)
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            filter: None,
            progress_callback: None,
            io_threads: 1,
        }
    }
}

impl FinderConfig {
    /// Restrict the scan to files accepted by `filter`.
    #[must_use]
    pub fn with_filter(mut self, filter: PathFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Set the number of hashing threads.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }
}

/// Errors that can occur while setting up a [`Finder`].
///
/// Once a finder exists, nothing it does can fail as a whole; per-file
/// problems end up in the [`Report`].
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The destination directory could not be created.
    #[error("Cannot create destination directory {path}: {source}")]
    CreateDestination {
        /// Directory that could not be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Destination file name for the `sequence`-th copy of `path`.
///
/// # Example
///
/// ```
/// use waddup::duplicates::destination_name;
/// use std::path::Path;
///
/// assert_eq!(destination_name(7, Path::new("/wads/doom.wad")), "000007_doom.wad");
/// ```
#[must_use]
pub fn destination_name(sequence: u64, path: &Path) -> OsString {
    let mut name = OsString::from(format!("{sequence:0width$}_", width = SEQUENCE_WIDTH));
    match path.file_name() {
        Some(file_name) => name.push(file_name),
        None => name.push("unnamed"),
    }
    name
}

/// Single-shot duplicate finder bound to a source (and optional destination)
/// directory.
///
/// [`Finder::find_duplicates`] consumes the finder; construct a new one for
/// another run.
pub struct Finder {
    source: PathBuf,
    destination: Option<PathBuf>,
    /// Destination relative to the source, when it lives inside it
    nested_destination: Option<PathBuf>,
    config: FinderConfig,
    hasher: Hasher,
    copy_counter: u64,
    report: Report,
}

impl std::fmt::Debug for Finder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Finder")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("config", &self.config)
            .field("copy_counter", &self.copy_counter)
            .finish()
    }
}

impl Finder {
    /// Create a finder, validating the directories.
    ///
    /// The destination is created (with parents) if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - The source does not exist or is not a directory
    /// - The destination exists but is not a directory
    /// - The destination cannot be created
    pub fn new(
        source: &Path,
        destination: Option<&Path>,
        config: FinderConfig,
    ) -> Result<Self, FinderError> {
        if !source.exists() {
            return Err(FinderError::PathNotFound(source.to_path_buf()));
        }
        if !source.is_dir() {
            return Err(FinderError::NotADirectory(source.to_path_buf()));
        }

        if let Some(dest) = destination {
            if dest.exists() {
                if !dest.is_dir() {
                    return Err(FinderError::NotADirectory(dest.to_path_buf()));
                }
            } else {
                fs::create_dir_all(dest).map_err(|e| FinderError::CreateDestination {
                    path: dest.to_path_buf(),
                    source: e,
                })?;
                log::info!("Created destination directory {}", dest.display());
            }
        }

        let nested_destination = destination.and_then(|dest| nested_path(source, dest));

        Ok(Self {
            source: source.to_path_buf(),
            destination: destination.map(Path::to_path_buf),
            nested_destination,
            config,
            hasher: Hasher::new(),
            copy_counter: 0,
            report: Report::default(),
        })
    }

    /// Source directory being scanned.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Destination directory, if materialization is enabled.
    #[must_use]
    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Walk the source directory and find duplicate files.
    ///
    /// Never fails: unreadable directories, unhashable files and failed
    /// copies are recorded as report entries and the run continues.
    #[must_use]
    pub fn find_duplicates(mut self) -> Report {
        let start = Instant::now();
        log::info!("Starting duplicate scan of {}", self.source.display());

        let size_index = self.enumerate();
        self.run(size_index, start)
    }

    /// Find duplicates among an already collected list of files.
    ///
    /// Skips the directory walk; everything else behaves as in
    /// [`Finder::find_duplicates`].
    #[must_use]
    pub fn find_duplicates_from_files(self, files: Vec<FileRecord>) -> Report {
        let start = Instant::now();
        let mut size_index = SizeIndex::new();
        for file in files {
            size_index.insert(file);
        }
        self.run(size_index, start)
    }

    fn run(mut self, size_index: SizeIndex, start: Instant) -> Report {
        {
            let summary = self.report.summary_mut();
            summary.total_files = size_index.total_files();
            summary.total_size = size_index.total_size();
            summary.files_to_hash = size_index.files_to_hash();
        }

        if size_index.is_empty() {
            log::info!("No qualifying files found in {}", self.source.display());
            self.report.push(ReportEntry::NoFiles {
                source: self.source.clone(),
            });
            return self.finish(start);
        }

        let (unique, candidates) = size_index.into_partition();
        log::info!(
            "{} files unique by size, {} files to hash",
            unique.len(),
            candidates.len()
        );

        if self.destination.is_some() {
            for file in &unique {
                self.materialize(file);
            }
        }

        let hash_index = self.classify(candidates);
        self.aggregate(hash_index);
        self.finish(start)
    }

    fn finish(mut self, start: Instant) -> Report {
        let summary = self.report.summary_mut();
        summary.duration = start.elapsed();
        log::info!(
            "Scan complete: {} duplicate groups, {} copies in {:.2?}",
            summary.duplicate_groups,
            summary.copies_attempted,
            summary.duration
        );
        self.report
    }

    /// Walk the source tree into a size index.
    fn enumerate(&mut self) -> SizeIndex {
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(PHASE_WALKING, 0);
            callback.on_message(&format!("Walking {}", self.source.display()));
        }

        let mut walker = Walker::new(&self.source);
        if let Some(ref filter) = self.config.filter {
            walker = walker.with_filter(filter.clone());
        }

        let mut index = SizeIndex::new();
        let mut seen = 0;

        for result in walker.walk() {
            match result {
                Ok(file) => {
                    if self.is_in_destination(&file.path) {
                        log::trace!("Skipping file in destination: {}", file.path.display());
                        continue;
                    }
                    seen += 1;
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_progress(seen, file.path.to_string_lossy().as_ref());
                    }
                    index.insert(file);
                }
                Err(e) => {
                    log::warn!("{}", e);
                    self.report.push(ReportEntry::ScanFailed {
                        path: e.path().to_path_buf(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(PHASE_WALKING);
        }
        log::debug!("Walk found {} files", seen);

        index
    }

    fn is_in_destination(&self, path: &Path) -> bool {
        self.nested_destination.as_ref().is_some_and(|nested| {
            path.strip_prefix(&self.source)
                .is_ok_and(|relative| relative.starts_with(nested))
        })
    }

    /// Hash every candidate and bucket the results by digest.
    fn classify(&mut self, candidates: Vec<FileRecord>) -> HashIndex {
        let mut index = HashIndex::new();
        if candidates.is_empty() {
            return index;
        }

        let total = candidates.len();
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(PHASE_HASHING, total);
        }
        log::info!("Hashing {} files", total);

        let results = self.hash_all(candidates);

        for (file, result) in results {
            match result {
                Ok(digest) => {
                    log::trace!("{} {}", digest, file.path.display());
                    self.report.summary_mut().hashed_files += 1;
                    index.insert(digest, file);
                }
                Err(e) => {
                    log::warn!("Failed to hash {}: {}", file.path.display(), e);
                    self.report.summary_mut().failed_hashes += 1;
                    self.report.push(ReportEntry::HashFailed {
                        path: file.path,
                        error: e.to_string(),
                    });
                }
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(PHASE_HASHING);
        }

        index
    }

    /// Compute digests, returning results in the same order as `files`.
    fn hash_all(&self, files: Vec<FileRecord>) -> Vec<(FileRecord, Result<String, HashError>)> {
        let done = Mutex::new(0usize);
        let hash_one = |file: FileRecord| {
            let result = self.hasher.digest(&file.path);
            self.tick(&done, &file);
            (file, result)
        };

        if self.config.io_threads <= 1 || files.len() < 2 {
            return files.into_iter().map(hash_one).collect();
        }

        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .build()
        {
            Ok(pool) => pool.install(|| files.into_par_iter().map(hash_one).collect()),
            Err(e) => {
                log::warn!("Failed to create hashing thread pool, hashing sequentially: {}", e);
                files.into_iter().map(hash_one).collect()
            }
        }
    }

    /// Count one finished hash and notify the callback.
    ///
    /// The lock spans the callback so progress is reported in order even
    /// when hashing runs on several threads.
    fn tick(&self, done: &Mutex<usize>, file: &FileRecord) {
        let mut count = done.lock().unwrap_or_else(PoisonError::into_inner);
        *count += 1;
        if let Some(ref callback) = self.config.progress_callback {
            callback.on_progress(*count, file.path.to_string_lossy().as_ref());
        }
    }

    /// Report duplicate groups and copy each group's first member.
    fn aggregate(&mut self, index: HashIndex) {
        for group in index.into_duplicate_groups() {
            log::debug!(
                "Duplicate group {} with {} files of {} bytes",
                group.digest,
                group.len(),
                group.size
            );

            {
                let summary = self.report.summary_mut();
                summary.duplicate_groups += 1;
                summary.duplicate_files += group.duplicate_count();
                summary.reclaimable_space += group.wasted_space();
            }

            let representative = group.representative().cloned();
            self.report.push(ReportEntry::Group(group));

            if let Some(file) = representative {
                if self.destination.is_some() {
                    self.materialize(&file);
                }
            }
        }
    }

    /// Copy one file into the destination under its sequence name.
    fn materialize(&mut self, file: &FileRecord) {
        let Some(dest_dir) = self.destination.clone() else {
            return;
        };

        self.copy_counter += 1;
        let sequence = self.copy_counter;
        let target = dest_dir.join(destination_name(sequence, &file.path));
        self.report.summary_mut().copies_attempted += 1;

        match fs::copy(&file.path, &target) {
            Ok(bytes) => {
                log::debug!(
                    "Copied {} -> {} ({} bytes)",
                    file.path.display(),
                    target.display(),
                    bytes
                );
                self.report.record_copy(CopiedFile {
                    sequence,
                    source: file.path.clone(),
                    destination: target,
                });
            }
            Err(e) => {
                log::warn!(
                    "Failed to copy {} to {}: {}",
                    file.path.display(),
                    target.display(),
                    e
                );
                self.report.summary_mut().failed_copies += 1;
                self.report.push(ReportEntry::CopyFailed {
                    source: file.path.clone(),
                    destination: target,
                    error: e.to_string(),
                });
            }
        }
    }
}

/// `dest` relative to `source` if it lies inside it.
fn nested_path(source: &Path, dest: &Path) -> Option<PathBuf> {
    let source = source.canonicalize().ok()?;
    let dest = dest.canonicalize().ok()?;
    dest.strip_prefix(&source)
        .ok()
        .filter(|relative| !relative.as_os_str().is_empty())
        .map(Path::to_path_buf)
}
