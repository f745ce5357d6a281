//! waddup - report files with identical content under a directory.

use waddup::cli::{parse_or_exit, ScanCli};
use waddup::error::ExitCode;
use waddup::logging::init_logging;

fn main() {
    let cli: ScanCli = parse_or_exit();
    init_logging(cli.common.verbose, cli.common.quiet);

    match waddup::run_scan(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;
            eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
