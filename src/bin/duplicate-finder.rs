//! duplicate-finder - report duplicate WAD files and copy one of each
//! distinct file to a destination directory.

use waddup::cli::{parse_or_exit, DedupeCli};
use waddup::error::ExitCode;
use waddup::logging::init_logging;

fn main() {
    let cli: DedupeCli = parse_or_exit();
    init_logging(cli.common.verbose, cli.common.quiet);

    match waddup::run_dedupe(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;
            eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
