//! waddup - Content-based duplicate finder for WAD archive collections
//!
//! Walks a directory tree, buckets files by size, confirms duplicates with
//! SHA-256 and, optionally, copies one file per distinct content to a
//! destination directory as `<6-digit sequence>_<file name>`.
//!
//! Two binaries share this library:
//!
//! - `waddup` reports duplicates among all files (or one extension)
//! - `duplicate-finder` reports duplicate WADs and writes the deduplicated copy

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use cli::{CommonArgs, DedupeCli, OutputFormat, ScanCli};
use config::Config;
use duplicates::{Finder, FinderConfig, Report};
use error::ExitCode;
use output::{JsonOutput, TextOutput, NO_DUPLICATES, NO_DUPLICATE_WADS};
use progress::Progress;
use scanner::{all_of, extension_filter, skip_hidden_filter, PathFilter};

/// Run the `waddup` report-only scan.
///
/// # Errors
///
/// Returns an error if the source directory is invalid or the report
/// cannot be written to stdout.
pub fn run_scan(cli: ScanCli) -> anyhow::Result<ExitCode> {
    let config = load_config(&cli.common);
    let filter = build_filter(&cli.source, cli.extension.as_deref(), config.skip_hidden);

    let report = run_finder(&cli.source, None, filter, &config, &cli.common)?;
    write_report(&report, cli.common.output, NO_DUPLICATES)?;
    Ok(ExitCode::Success)
}

/// Run `duplicate-finder`: report duplicates and materialize the
/// deduplicated copy in the destination directory.
///
/// # Errors
///
/// Returns an error if the source is invalid, the destination cannot be
/// created, or the report cannot be written to stdout.
pub fn run_dedupe(cli: DedupeCli) -> anyhow::Result<ExitCode> {
    let config = load_config(&cli.common);
    let extension = if cli.all_files {
        None
    } else {
        Some(
            cli.extension
                .as_deref()
                .unwrap_or(config.archive_extension.as_str()),
        )
    };
    let filter = build_filter(&cli.source, extension, config.skip_hidden);

    let report = run_finder(
        &cli.source,
        Some(&cli.destination),
        filter,
        &config,
        &cli.common,
    )?;
    write_report(&report, cli.common.output, NO_DUPLICATE_WADS)?;
    Ok(ExitCode::Success)
}

fn load_config(common: &CommonArgs) -> Config {
    let mut config = match &common.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    config.merge_common_args(common);
    log::debug!("Effective configuration: {:?}", config);
    config
}

fn build_filter(source: &Path, extension: Option<&str>, skip_hidden: bool) -> Option<PathFilter> {
    let mut filters = Vec::new();
    if let Some(ext) = extension.filter(|e| !e.is_empty()) {
        filters.push(extension_filter(ext));
    }
    if skip_hidden {
        filters.push(skip_hidden_filter(source));
    }

    match filters.len() {
        0 => None,
        1 => filters.pop(),
        _ => Some(all_of(filters)),
    }
}

fn run_finder(
    source: &Path,
    destination: Option<&Path>,
    filter: Option<PathFilter>,
    config: &Config,
    common: &CommonArgs,
) -> anyhow::Result<Report> {
    let quiet = common.quiet || common.output == OutputFormat::Json;
    let progress = Arc::new(Progress::new(quiet));

    let mut finder_config = FinderConfig::default()
        .with_io_threads(config.io_threads)
        .with_progress_callback(progress);
    if let Some(filter) = filter {
        finder_config = finder_config.with_filter(filter);
    }

    let finder = Finder::new(source, destination, finder_config)
        .with_context(|| format!("Cannot scan {}", source.display()))?;
    let report = finder.find_duplicates();

    let summary = report.summary();
    log::info!(
        "Scanned {} files ({}), {} duplicate groups, {} reclaimable ({:.1}%), {} copies in {:?}",
        summary.total_files,
        summary.total_size_display(),
        summary.duplicate_groups,
        summary.reclaimable_display(),
        summary.wasted_percentage(),
        report.copies().len(),
        summary.duration,
    );

    Ok(report)
}

fn write_report(report: &Report, format: OutputFormat, empty_message: &str) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Text => TextOutput::new(report, empty_message)
            .write_to(&mut handle)
            .context("Failed to write report")?,
        OutputFormat::Json => JsonOutput::new(report)
            .write_to(&mut handle, true)
            .context("Failed to write JSON report")?,
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}
