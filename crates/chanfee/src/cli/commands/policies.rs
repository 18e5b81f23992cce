//! # Policies Command
//!
//! Implementation of `chanfee policies`, which lists the policies in the
//! order they are tried.
//!
//! ## Output Format
//!
//! ```text
//! 1. drained
//!    match: chan.max_ratio=0.2
//!    apply: strategy=static fee_ppm=1000
//! 2. catch_all
//!    match: (always)
//!    apply: strategy=proportional
//! default
//!    apply: strategy=static
//! ```

use std::fmt::Write;
use std::path::PathBuf;

use chanfee_core::error::ConfigError;
use chanfee_policy::engine::PolicyMatcher;
use chanfee_policy::policy::Policy;

use super::exit_codes::EXIT_CONFIG_ERROR;
use super::load_document;

/// Errors that can occur while listing policies.
#[derive(Debug, thiserror::Error)]
pub enum PoliciesError {
    /// The document is missing or invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl PoliciesError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => EXIT_CONFIG_ERROR,
        }
    }
}

/// The `chanfee policies` command handler.
#[derive(Debug, Clone, Default)]
pub struct PoliciesCommand {
    /// Policy document path; the default location when `None`.
    pub config: Option<PathBuf>,
}

impl PoliciesCommand {
    /// Create a new `PoliciesCommand`.
    #[must_use]
    pub const fn new(config: Option<PathBuf>) -> Self {
        Self { config }
    }

    /// Builds the listing.
    ///
    /// # Errors
    ///
    /// Returns [`PoliciesError::Config`] if the document is missing or
    /// invalid.
    pub fn execute(&self) -> Result<String, PoliciesError> {
        let document = load_document(self.config.as_deref())?;
        let matcher = PolicyMatcher::new(&document, ())?;

        let mut out = String::new();
        for (index, policy) in matcher.policies().iter().enumerate() {
            let _ = writeln!(out, "{}. {}", index + 1, policy.name());
            let _ = writeln!(out, "   match: {}", format_predicates(policy));
            let _ = writeln!(out, "   apply: {}", format_actions(policy));
        }
        let default = matcher.default_policy();
        let _ = writeln!(out, "{}", default.name());
        let _ = writeln!(out, "   apply: {}", format_actions(default));
        Ok(out)
    }

    /// Runs the command and prints the listing.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub fn run(&self) -> Result<(), PoliciesError> {
        print!("{}", self.execute()?);
        Ok(())
    }
}

fn format_predicates(policy: &Policy) -> String {
    let predicates: Vec<String> = policy
        .predicate_keys()
        .filter_map(|key| {
            policy
                .settings()
                .get(key)
                .map(|value| format!("{key}={value}"))
        })
        .collect();
    if predicates.is_empty() {
        "(always)".to_string()
    } else {
        predicates.join(" ")
    }
}

/// Formats the settings applied on a match, or `(none)`.
fn format_actions(policy: &Policy) -> String {
    let actions: Vec<String> = policy
        .action_settings()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    if actions.is_empty() {
        "(none)".to_string()
    } else {
        actions.join(" ")
    }
}
