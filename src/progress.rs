//! Progress reporting utilities using indicatif.
//!
//! The duplicate finder never writes to the console itself; it notifies an
//! optional [`ProgressCallback`] instead. [`Progress`] is the terminal
//! implementation used by the binaries.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Phase name used while walking the source directory.
pub const PHASE_WALKING: &str = "walking";
/// Phase name used while hashing same-size files.
pub const PHASE_HASHING: &str = "hashing";

/// Progress callback for duplicate finding phases.
///
/// Implement this trait to receive progress updates during
/// the duplicate detection pipeline.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase ([`PHASE_WALKING`] or [`PHASE_HASHING`])
    /// * `total` - Total number of items to process (0 if unknown)
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called after each item is processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Number of items processed so far (1-based, never decreasing)
    /// * `path` - Path just processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Terminal progress reporter.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    hashing: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use waddup::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            walking: Mutex::new(None),
            hashing: Mutex::new(None),
            quiet,
        }
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn with_bar<F: FnOnce(&ProgressBar)>(slot: &Mutex<Option<ProgressBar>>, f: F) -> bool {
        match slot.lock() {
            Ok(guard) => match guard.as_ref() {
                Some(pb) => {
                    f(pb);
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    fn store(slot: &Mutex<Option<ProgressBar>>, pb: Option<ProgressBar>) -> Option<ProgressBar> {
        slot.lock().map_or(None, |mut guard| std::mem::replace(&mut *guard, pb))
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        match phase {
            PHASE_WALKING => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::walking_style());
                pb.set_message("Walking directory");
                pb.enable_steady_tick(Duration::from_millis(100));
                Self::store(&self.walking, Some(pb));
            }
            _ => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::hashing_style());
                pb.set_message("Hashing");
                Self::store(&self.hashing, Some(pb));
            }
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        let message = truncate_path(path, 30);
        let update = |pb: &ProgressBar| {
            // Parallel hashing may report out of order; never move backwards.
            if current as u64 > pb.position() {
                pb.set_position(current as u64);
            }
            pb.set_message(message.clone());
        };

        if !Self::with_bar(&self.hashing, update) {
            Self::with_bar(&self.walking, |pb| pb.set_position(current as u64));
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        let (slot, done) = match phase {
            PHASE_WALKING => (&self.walking, "Walking complete"),
            _ => (&self.hashing, "Hashing complete"),
        };
        if let Some(pb) = Self::store(slot, None) {
            pb.finish_with_message(done);
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }

        let set = |pb: &ProgressBar| pb.set_message(message.to_string());
        if !Self::with_bar(&self.hashing, set) {
            Self::with_bar(&self.walking, set);
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let chars = file_name.chars().count();
    if chars >= max_len {
        let tail: String = file_name.chars().skip(chars + 3 - max_len).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
