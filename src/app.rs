//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use dropconf::{Error, ErrorKind};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Usage error (exit code 1) - malformed option string.
    pub const USAGE_ERROR: ExitCode = ExitCode::FAILURE;

    /// Configuration error (exit code 2) - nothing found, parse failure, policy rejection.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn config_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Prints helpful hints for common errors.
pub fn print_error_hint(error: &Error) {
    match error.kind() {
        ErrorKind::NotFound => {
            eprintln!("\nUse 'dropconf files' with --dir or --project to check where files are searched.");
        }
        ErrorKind::OptionNotFound => {
            eprintln!(
                "\nKnown options: JOIN_SAME_ENTRIES, PYTHON_STYLE, CONFIG_DIRS, PARSING_DIRS, ROOT_PREFIX."
            );
        }
        kind if kind.is_syntax() => {
            eprintln!("\nCheck --delimiters and --comments match the file's syntax.");
        }
        _ => {}
    }
}

/// Sets up the tracing subscriber for logging.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
