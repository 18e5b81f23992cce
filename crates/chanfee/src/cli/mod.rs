//! # CLI Module
//!
//! Command-line interface for chanfee.
//!
//! ## Module Structure
//!
//! - [`args`] - Argument parsing and CLI structure definitions
//! - [`commands`] - Command handler implementations
//!
//! ## Commands
//!
//! - `chanfee check` - Validate the policy document
//! - `chanfee policies` - List policies in priority order
//! - `chanfee select --snapshot <FILE> [--channel <ID>] [--format text|json]` -
//!   Select the policy for each channel of a node snapshot

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, OutputFormat};
