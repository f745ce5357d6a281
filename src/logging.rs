//! Logging setup shared by both binaries.
//!
//! Records go through the `log` facade to an `env_logger` backend on
//! stderr, leaving stdout to the report. The filter comes from `RUST_LOG`
//! when it is set, otherwise from the command-line flags:
//!
//! | flags   | level |
//! |---------|-------|
//! | `-q`    | error |
//! | (none)  | warn  |
//! | `-v`    | info  |
//! | `-vv`   | debug |
//! | `-vvv`  | trace |
//!
//! Per-file failures are logged at warn, so they show up by default.
//!
//! ```rust,no_run
//! waddup::logging::init_logging(1, false);
//! log::info!("Hashing 12 files");
//! ```

use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

const RUST_LOG: &str = "RUST_LOG";

/// Install the global logger. Later calls are ignored.
pub fn init_logging(verbose: u8, quiet: bool) {
    let from_env = std::env::var_os(RUST_LOG).is_some();
    let level = level_for(verbose, quiet);

    let mut builder = Builder::new();
    if from_env {
        builder.parse_env(RUST_LOG);
    } else {
        builder.filter_level(level);
    }
    apply_format(&mut builder, verbose >= 2);

    if builder.try_init().is_ok() {
        if from_env {
            log::debug!("Log filter taken from {}", RUST_LOG);
        } else {
            log::debug!("Log level {}", level);
        }
    }
}

fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, 2) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// `[LEVEL] message`, with a timestamp and the emitting module when
/// `detailed` is set.
fn apply_format(builder: &mut Builder, detailed: bool) {
    builder.format(move |buf, record| {
        let style = buf.default_level_style(record.level());
        if detailed {
            let module = record.module_path().unwrap_or("?");
            let stamp = buf.timestamp_millis();
            writeln!(
                buf,
                "{stamp} {style}{:<5}{style:#} {module}: {}",
                record.level(),
                record.args()
            )
        } else {
            writeln!(buf, "{style}{:<5}{style:#} {}", record.level(), record.args())
        }
    });
}
