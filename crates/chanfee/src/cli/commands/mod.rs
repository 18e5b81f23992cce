//! # CLI Command Handlers
//!
//! ## Module Structure
//!
//! - [`check`] - Validate the policy document
//! - [`policies`] - List policies in priority order
//! - [`select`] - Select policies for channels in a node snapshot
//! - [`exit_codes`] - Process exit codes
//!
//! ## Error Handling
//!
//! Each command has its own error enum with an `exit_code()` method. The
//! main function prints the error and exits with that code.

pub mod check;
pub mod exit_codes;
pub mod policies;
pub mod select;

use std::path::Path;

use chanfee_core::config::PolicyDocument;
use chanfee_core::config_loader::{expand_path, load_from_path, ConfigLoader};
use chanfee_core::error::ConfigError;

pub use check::{CheckCommand, CheckError};
pub use policies::{PoliciesCommand, PoliciesError};
pub use select::{SelectCommand, SelectCommandError, SelectionOutput};

/// Loads the policy document from `path`, or from the default location.
///
/// A leading `~` in `path` is expanded. Unlike [`ConfigLoader::load`], a
/// missing file is an error: selecting against an empty document would
/// silently apply the default policy everywhere.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file is missing, unreadable or not valid
/// TOML.
pub fn load_document(path: Option<&Path>) -> Result<PolicyDocument, ConfigError> {
    match path {
        Some(path) => {
            let expanded = match path.to_str() {
                Some(s) => expand_path(s)?,
                None => path.to_path_buf(),
            };
            load_from_path(&expanded)
        }
        None => ConfigLoader::new()?.load_required(),
    }
}
