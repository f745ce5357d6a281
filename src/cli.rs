//! Command-line interface definitions for the waddup binaries.
//!
//! Two entry points share the same engine:
//!
//! ```bash
//! # Report duplicates among all files under a directory
//! waddup ~/games
//!
//! # Only consider WAD archives, JSON output
//! waddup ~/games --ext wad --output json
//!
//! # Report duplicate WADs and copy one of each distinct file to ~/unique
//! duplicate-finder ~/games ~/unique
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

use crate::error::ExitCode;

/// Report files with identical content under a directory.
#[derive(Debug, Parser)]
#[command(name = "waddup")]
#[command(author, version, about, long_about = None)]
pub struct ScanCli {
    /// Directory to scan for duplicates
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Only consider files with this extension (e.g. wad)
    #[arg(long = "ext", value_name = "EXT")]
    pub extension: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Find duplicate WAD files and copy one of each distinct file to a
/// destination directory.
#[derive(Debug, Parser)]
#[command(name = "duplicate-finder")]
#[command(author, version, about, long_about = None)]
pub struct DedupeCli {
    /// Directory to scan for duplicates
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Directory receiving the deduplicated copies (created if missing)
    #[arg(value_name = "DESTINATION")]
    pub destination: PathBuf,

    /// Archive extension to consider (default from config: wad)
    #[arg(long = "ext", value_name = "EXT", conflicts_with = "all_files")]
    pub extension: Option<String>,

    /// Consider every regular file, not just archives
    #[arg(long)]
    pub all_files: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Options shared by both binaries.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Increase verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress and all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format for the report
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Number of threads used for hashing (default from config: 1)
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH", env = "WADDUP_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report lines
    Text,
    /// JSON document for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Parse arguments, exiting with status 1 and a usage message on error.
///
/// `--help` and `--version` exit with status 0.
#[must_use]
pub fn parse_or_exit<P: Parser>() -> P {
    match P::try_parse() {
        Ok(parsed) => parsed,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::GeneralError
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            std::process::exit(code.as_i32());
        }
    }
}
