//! # chanfee
//!
//! Selects, for each channel of a Lightning node, the fee policy that
//! governs it.
//!
//! This crate provides both a library interface and the `chanfee` binary.
//! Policy evaluation itself lives in [`chanfee_policy`]; this crate adds the
//! command line, logging setup and node snapshots.
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions and handlers
//! - [`logging`] - Tracing subscriber setup
//! - [`snapshot`] - JSON node snapshots used as the data source
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use chanfee::cli::Cli;
//!
//! let cli = Cli::parse();
//! println!("Verbose level: {}", cli.verbose);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cli;
pub mod logging;
pub mod snapshot;

pub use logging::{
    init_logging, verbosity_to_level, LogConfig, LogError, LogFormat, LogGuard, LogLevel,
};
pub use snapshot::NodeSnapshot;
