//! # chanfee
//!
//! Lightning channel fee policy selector.
//!
//! ## Usage
//!
//! ```bash
//! # Validate the policy document
//! chanfee check
//!
//! # List policies in priority order
//! chanfee -c policies.toml policies
//!
//! # Select a policy for every channel in a node snapshot
//! chanfee select --snapshot node.json
//!
//! # One channel, JSON output, with debug logging
//! chanfee -vv select --snapshot node.json --channel 800000x12x1 --format json
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::path::PathBuf;

use chanfee::cli::commands::exit_codes::{EXIT_ERROR, EXIT_SUCCESS};
use chanfee::cli::commands::{CheckCommand, PoliciesCommand, SelectCommand};
use chanfee::cli::{Cli, Commands};
use chanfee::logging::{
    init_logging, verbosity_to_level, LogConfig, LogError, LogFormat, LogGuard,
};
use clap::Parser;

/// Set up logging based on the global options.
///
/// # Errors
///
/// Returns [`LogError`] if logging initialization fails.
fn setup_logging(
    verbose: u8,
    format: LogFormat,
    file_path: Option<PathBuf>,
) -> Result<LogGuard, LogError> {
    let config = LogConfig {
        level: verbosity_to_level(verbose),
        format,
        file_path,
    };
    init_logging(&config)
}

/// Main entry point for the `chanfee` application.
fn main() {
    let cli = Cli::parse();

    let guard = match setup_logging(cli.verbose, cli.log_format, cli.log_file) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            std::process::exit(EXIT_ERROR);
        }
    };

    let result = match cli.command {
        Commands::Check => CheckCommand::new(cli.config)
            .run()
            .map_err(|e| (e.exit_code(), e.to_string())),
        Commands::Policies => PoliciesCommand::new(cli.config)
            .run()
            .map_err(|e| (e.exit_code(), e.to_string())),
        Commands::Select {
            snapshot,
            channel,
            format,
        } => SelectCommand::new(cli.config, snapshot, channel, format)
            .run()
            .map_err(|e| (e.exit_code(), e.to_string())),
    };

    let code = match result {
        Ok(()) => EXIT_SUCCESS,
        Err((code, message)) => {
            eprintln!("Error: {message}");
            code
        }
    };
    tracing::debug!(exit_code = code, "exiting");

    // Flush file logs before exiting.
    drop(guard);
    std::process::exit(code);
}
