//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the platform config directory (or `--config`)
//! 3. `WADDUP_*` environment variables (e.g. `WADDUP_IO_THREADS=4`)
//! 4. CLI flags, applied with [`Config::merge_common_args`]

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::CommonArgs;

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "WADDUP_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extension `duplicate-finder` restricts itself to.
    pub archive_extension: String,
    /// Threads used for hashing; 1 hashes sequentially.
    pub io_threads: usize,
    /// Skip hidden files and directories.
    pub skip_hidden: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive_extension: "wad".to_string(),
            io_threads: 1,
            skip_hidden: false,
        }
    }
}

impl Config {
    /// Load the configuration from the default platform-specific path.
    ///
    /// Falls back to defaults plus environment overrides when no config
    /// directory can be determined.
    #[must_use]
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from_path(path),
            None => Self::extract(Self::base_figment().merge(Env::prefixed(ENV_PREFIX))),
        }
    }

    /// Load the configuration from `path`, then apply environment overrides.
    ///
    /// A missing file is not an error. An unreadable or invalid one is
    /// logged and the defaults are used.
    #[must_use]
    pub fn load_from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        log::debug!("Loading configuration from {}", path.display());
        Self::extract(
            Self::base_figment()
                .merge(Toml::file(path))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    fn base_figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    fn extract(figment: Figment) -> Self {
        match figment.extract::<Self>() {
            Ok(config) => config.normalized(),
            Err(e) => {
                log::warn!("Invalid configuration, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn normalized(mut self) -> Self {
        self.io_threads = self.io_threads.max(1);
        self.archive_extension = self.archive_extension.trim_start_matches('.').to_string();
        self
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "waddup", "waddup").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply CLI flags on top of the loaded configuration.
    pub fn merge_common_args(&mut self, args: &CommonArgs) {
        if let Some(threads) = args.io_threads {
            self.io_threads = threads.max(1);
        }
        if args.skip_hidden {
            self.skip_hidden = true;
        }
    }
}
