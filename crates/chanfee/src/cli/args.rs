//! # CLI Argument Definitions
//!
//! This module defines the command-line interface structure using clap derive macros.
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level
//! - `-c, --config <PATH>` - Path to the policy document
//! - `--log-format <FORMAT>` - Log output format
//! - `--log-file <PATH>` - Also write logs to a daily-rolling file

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::logging::LogFormat;

/// Lightning channel fee policy selector.
///
/// Reads an ordered list of named policies and decides, for each channel,
/// which one governs its fees.
#[derive(Debug, Parser)]
#[command(name = "chanfee")]
#[command(author, version, about = "Lightning channel fee policy selector")]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    ///
    /// - `-v` - Show info messages (selected policies)
    /// - `-vv` - Show debug messages (every policy evaluated)
    /// - `-vvv` - Show trace messages
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the policy document
    ///
    /// Defaults to `~/.chanfee/policies.toml`.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, default_value = "compact", value_name = "FORMAT")]
    pub log_format: LogFormat,

    /// Also write logs to this file (rolled daily)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate the policy document
    ///
    /// Loads the document and checks every policy for unknown namespaces,
    /// unknown properties and malformed values.
    Check,

    /// List policies in priority order
    ///
    /// Shows each policy's match predicates and the settings applied when it
    /// matches. The default policy is listed last.
    Policies,

    /// Select the policy for channels in a node snapshot
    Select {
        /// JSON node snapshot
        #[arg(short, long, value_name = "FILE")]
        snapshot: PathBuf,

        /// Only evaluate this channel (decimal or BLOCKxTXxOUTPUT)
        #[arg(long, value_name = "ID")]
        channel: Option<String>,

        /// Output format
        ///
        /// - `text` - One line per channel (default)
        /// - `json` - JSON array with the selected policy's settings
        #[arg(short, long, default_value = "text", value_name = "FORMAT")]
        format: OutputFormat,
    },
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,

    /// JSON output
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}
