//! # Select Command
//!
//! Implementation of `chanfee select`, which loads the policy document and a
//! node snapshot and reports the policy selected for each channel.
//!
//! ## Output Format
//!
//! Text, one line per channel:
//!
//! ```text
//! 800000x12x1  03bb...  ratio=0.300  drained  strategy=static fee_ppm=1000
//! ```
//!
//! JSON, an array of [`SelectionOutput`] objects.

use std::fmt::Write;
use std::path::PathBuf;

use chanfee_core::config::Settings;
use chanfee_core::error::{ChannelIdError, ConfigError, MatchError, SourceError};
use chanfee_core::types::{Channel, ChannelId};
use chanfee_policy::engine::{PolicyMatcher, PolicySelector};
use chanfee_policy::namespace::split_key;
use serde::Serialize;

use super::exit_codes::{EXIT_CONFIG_ERROR, EXIT_ERROR, EXIT_SOURCE_ERROR};
use super::load_document;
use crate::cli::args::OutputFormat;
use crate::snapshot::NodeSnapshot;

// ============================================================================
// SelectCommandError
// ============================================================================

/// Errors that can occur while selecting policies.
#[derive(Debug, thiserror::Error)]
pub enum SelectCommandError {
    /// The policy document is missing or invalid.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// The snapshot could not be loaded.
    #[error("Failed to load snapshot: {0}")]
    Snapshot(#[source] SourceError),

    /// Evaluation failed.
    #[error("{0}")]
    Match(#[from] MatchError),

    /// The `--channel` argument is not a channel id.
    #[error("Invalid channel id '{input}': {source}")]
    InvalidChannelId {
        /// The rejected argument.
        input: String,
        /// Why it was rejected.
        #[source]
        source: ChannelIdError,
    },

    /// The requested channel is not in the snapshot.
    #[error("Channel {0} not found in snapshot")]
    ChannelNotFound(ChannelId),

    /// JSON output could not be produced.
    #[error("Failed to format output: {0}")]
    Output(#[from] serde_json::Error),
}

impl SelectCommandError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Match(MatchError::Config(_)) => EXIT_CONFIG_ERROR,
            Self::Snapshot(_) | Self::Match(MatchError::Source(_)) => EXIT_SOURCE_ERROR,
            Self::InvalidChannelId { .. } | Self::ChannelNotFound(_) | Self::Output(_) => {
                EXIT_ERROR
            }
        }
    }
}

// ============================================================================
// SelectionOutput
// ============================================================================

/// The policy selected for one channel, as emitted in JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionOutput {
    /// Channel id in `BLOCKxTXxOUTPUT` form.
    pub chan_id: String,
    /// Remote node public key.
    pub remote_pubkey: String,
    /// Local balance ratio, absent for a channel without balance.
    pub ratio: Option<f64>,
    /// Name of the selected policy.
    pub policy: String,
    /// All settings of the selected policy, predicates included.
    pub settings: Settings,
}

// ============================================================================
// SelectCommand
// ============================================================================

/// The `chanfee select` command handler.
#[derive(Debug, Clone)]
pub struct SelectCommand {
    /// Policy document path; the default location when `None`.
    pub config: Option<PathBuf>,
    /// Node snapshot path.
    pub snapshot: PathBuf,
    /// Restrict selection to one channel.
    pub channel: Option<String>,
    /// Output format.
    pub format: OutputFormat,
}

impl SelectCommand {
    /// Create a new `SelectCommand`.
    #[must_use]
    pub const fn new(
        config: Option<PathBuf>,
        snapshot: PathBuf,
        channel: Option<String>,
        format: OutputFormat,
    ) -> Self {
        Self {
            config,
            snapshot,
            channel,
            format,
        }
    }

    /// Selects policies and renders the result.
    ///
    /// The policy document is loaded and validated before the snapshot is
    /// read, so configuration errors are reported first.
    ///
    /// # Errors
    ///
    /// Returns [`SelectCommandError`] if the document or snapshot cannot be
    /// loaded, the channel argument is invalid or unknown, or evaluation
    /// fails.
    pub fn execute(&self) -> Result<String, SelectCommandError> {
        let document = load_document(self.config.as_deref())?;

        let wanted = self
            .channel
            .as_deref()
            .map(|input| {
                input
                    .parse::<ChannelId>()
                    .map_err(|source| SelectCommandError::InvalidChannelId {
                        input: input.to_string(),
                        source,
                    })
            })
            .transpose()?;

        let validated = PolicyMatcher::new(&document, ())?;

        let snapshot = NodeSnapshot::load(&self.snapshot).map_err(SelectCommandError::Snapshot)?;
        let single = wanted
            .map(|id| {
                snapshot
                    .channel(id)
                    .cloned()
                    .ok_or(SelectCommandError::ChannelNotFound(id))
            })
            .transpose()?;
        let (all, source) = snapshot.into_parts();
        let channels: Vec<Channel> = single.map_or(all, |channel| vec![channel]);
        let matcher = validated.with_source(source);

        let selections = select_all(&matcher, &channels)?;
        match self.format {
            OutputFormat::Text => Ok(render_text(&selections)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&selections)? + "\n"),
        }
    }

    /// Runs the command and prints the result.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub fn run(&self) -> Result<(), SelectCommandError> {
        print!("{}", self.execute()?);
        Ok(())
    }
}

/// Selects a policy for every channel, stopping at the first error.
///
/// # Errors
///
/// Returns [`MatchError`] from the selector.
pub fn select_all<P: PolicySelector + ?Sized>(
    selector: &P,
    channels: &[Channel],
) -> Result<Vec<SelectionOutput>, MatchError> {
    channels
        .iter()
        .map(|channel| {
            let policy = selector.select(channel)?;
            Ok(SelectionOutput {
                chan_id: channel.chan_id.to_string(),
                remote_pubkey: channel.remote_pubkey.clone(),
                ratio: channel.ratio(),
                policy: policy.name().to_string(),
                settings: policy.settings().clone(),
            })
        })
        .collect()
}

fn render_text(selections: &[SelectionOutput]) -> String {
    let mut out = String::new();
    for selection in selections {
        let ratio = selection
            .ratio
            .map_or_else(|| "-".to_string(), |r| format!("{r:.3}"));
        let actions: Vec<String> = selection
            .settings
            .iter()
            .filter(|(key, _)| split_key(key).is_none())
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        let _ = writeln!(
            out,
            "{}  {}  ratio={}  {}  {}",
            selection.chan_id,
            selection.remote_pubkey,
            ratio,
            selection.policy,
            if actions.is_empty() {
                "(none)".to_string()
            } else {
                actions.join(" ")
            }
        );
    }
    out
}
