//! # Check Command
//!
//! Implementation of `chanfee check`, which loads the policy document and
//! validates every policy without evaluating any channel.
//!
//! ## Output Format
//!
//! ```text
//! Policy document OK: 2 policies
//!   1. drained
//!   2. big_peers
//!   default (explicit)
//! ```

use std::fmt::Write;
use std::path::PathBuf;

use chanfee_core::error::ConfigError;
use chanfee_policy::engine::PolicyMatcher;
use chanfee_policy::policy::DEFAULT_POLICY_NAME;

use super::exit_codes::EXIT_CONFIG_ERROR;
use super::load_document;

/// Errors that can occur while checking the policy document.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The document is missing or invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl CheckError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => EXIT_CONFIG_ERROR,
        }
    }
}

/// The `chanfee check` command handler.
#[derive(Debug, Clone, Default)]
pub struct CheckCommand {
    /// Policy document path; the default location when `None`.
    pub config: Option<PathBuf>,
}

impl CheckCommand {
    /// Create a new `CheckCommand`.
    #[must_use]
    pub const fn new(config: Option<PathBuf>) -> Self {
        Self { config }
    }

    /// Validates the document and returns the report.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Config`] on the first invalid policy.
    pub fn execute(&self) -> Result<String, CheckError> {
        let document = load_document(self.config.as_deref())?;
        let explicit_default = document.section(DEFAULT_POLICY_NAME).is_some();

        // Graph data is irrelevant to validation.
        let matcher = PolicyMatcher::new(&document, ())?;

        let mut out = String::new();
        let count = matcher.policies().len();
        let _ = writeln!(
            out,
            "Policy document OK: {count} {}",
            if count == 1 { "policy" } else { "policies" }
        );
        for (index, policy) in matcher.policies().iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", index + 1, policy.name());
        }
        let _ = writeln!(
            out,
            "  default ({})",
            if explicit_default { "explicit" } else { "implicit" }
        );
        Ok(out)
    }

    /// Runs the command and prints the report.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub fn run(&self) -> Result<(), CheckError> {
        print!("{}", self.execute()?);
        Ok(())
    }
}
