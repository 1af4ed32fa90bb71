//! dropconf: layered configuration inspector
//!
//! Entry point for the dropconf application.

use dropconf::cli::{Cli, execute};
use dropconf::ErrorKind;
use std::process::ExitCode;

mod app;

use app::{exit_code, print_error_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();
    setup_tracing(cli.verbose);

    match execute(&cli) {
        Ok(output) => {
            print!("{output}");
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            print_error_hint(&e);
            if e.kind() == ErrorKind::OptionNotFound {
                exit_code::USAGE_ERROR
            } else {
                exit_code::config_error()
            }
        }
    }
}
