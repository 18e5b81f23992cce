//! Policy selection for channels.
//!
//! This module provides the matcher that picks, for a channel, the single
//! policy that applies to it.
//!
//! # Selection Order
//!
//! Policies are evaluated in configuration order and never re-sorted:
//!
//! 1. Each policy's namespaces (`chan`, `node`) are evaluated; the policy
//!    matches only if all of them match.
//! 2. The first matching policy is returned.
//! 3. If none matches, the `default` policy is returned.
//!
//! Missing graph data (an unannounced edge, an unknown node) makes a policy
//! fail to match; selection then continues with the next policy.
//!
//! # Thread Safety
//!
//! [`PolicyMatcher`] is immutable after construction and `Send + Sync` when
//! its data source is. Nothing is cached between calls.
//!
//! # Example
//!
//! ```
//! use chanfee_core::config::{PolicyDocument, Settings};
//! use chanfee_core::source::MemoryNodeSource;
//! use chanfee_core::types::{Channel, ChannelId};
//! use chanfee_policy::engine::{PolicyMatcher, PolicySelector};
//!
//! let document = PolicyDocument::new()
//!     .with_section("default", Settings::new().with("strategy", "static"))
//!     .with_section("drained", Settings::new().with("chan.max_ratio", 0.2));
//!
//! let matcher = PolicyMatcher::new(&document, MemoryNodeSource::new("02me")).unwrap();
//!
//! let channel = Channel {
//!     chan_id: ChannelId::new(1),
//!     remote_pubkey: "03peer".to_string(),
//!     local_balance: 100_000,
//!     remote_balance: 900_000,
//!     capacity: 1_000_000,
//!     initiator: false,
//!     private: false,
//! };
//! assert_eq!(matcher.select(&channel).unwrap().name(), "drained");
//! ```

use crate::policy::{Policy, DEFAULT_POLICY_NAME};
use chanfee_core::config::ConfigurationSource;
use chanfee_core::error::{ConfigError, MatchError};
use chanfee_core::source::NodeDataSource;
use chanfee_core::types::Channel;

/// Trait for selectors that map a channel to its policy.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` so a single selector can serve
/// concurrent evaluations.
pub trait PolicySelector: Send + Sync {
    /// Returns the policy that applies to `channel`.
    ///
    /// Exactly one policy is returned on success; it is the default policy
    /// when no configured policy matches.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Config`] if a policy is malformed and
    /// [`MatchError::Source`] if the data source fails.
    fn select(&self, channel: &Channel) -> Result<&Policy, MatchError>;
}

/// First-match-wins selector over an ordered list of policies.
#[derive(Debug)]
pub struct PolicyMatcher<S> {
    policies: Vec<Policy>,
    default: Policy,
    source: S,
}

impl<S> PolicyMatcher<S> {
    /// Builds a matcher from a configuration and a data source.
    ///
    /// The `default` section, if any, becomes the fallback; every other
    /// section becomes a policy in configuration order. Every policy is
    /// validated here, so a malformed document is rejected before any
    /// channel is seen.
    ///
    /// The source is not consulted during construction. A document can be
    /// validated with `()` as the source and given real data afterwards
    /// through [`with_source`](Self::with_source).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be read, a policy
    /// uses an unknown namespace or key, a value has the wrong type, the
    /// `default` section appears twice, or the `default` section contains
    /// match predicates.
    pub fn new<C: ConfigurationSource + ?Sized>(config: &C, source: S) -> Result<Self, ConfigError> {
        let mut default: Option<Policy> = None;
        let mut policies = Vec::new();

        for section in config.sections()? {
            let policy = Policy::from(section);
            if policy.is_default() {
                if default.is_some() {
                    return Err(ConfigError::invalid_value(
                        DEFAULT_POLICY_NAME,
                        "section defined more than once",
                    ));
                }
                if let Some(key) = policy.predicate_keys().next() {
                    return Err(ConfigError::invalid_value(
                        key,
                        "the default policy cannot contain match predicates",
                    ));
                }
                default = Some(policy);
            } else {
                policy.validate()?;
                policies.push(policy);
            }
        }

        tracing::debug!(
            policies = policies.len(),
            explicit_default = default.is_some(),
            "policy matcher constructed"
        );

        Ok(Self {
            policies,
            default: default.unwrap_or_else(Policy::empty_default),
            source,
        })
    }

    /// Configured policies in priority order, excluding the default.
    #[must_use]
    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// The fallback policy.
    #[must_use]
    pub const fn default_policy(&self) -> &Policy {
        &self.default
    }

    /// Replaces the data source, keeping the validated policies.
    #[must_use]
    pub fn with_source<T>(self, source: T) -> PolicyMatcher<T> {
        PolicyMatcher {
            policies: self.policies,
            default: self.default,
            source,
        }
    }

    #[cfg(test)]
    pub(crate) const fn source(&self) -> &S {
        &self.source
    }
}

impl<S: NodeDataSource> PolicyMatcher<S> {
    /// Returns `true` if `channel` satisfies every predicate of `policy`.
    ///
    /// All of the policy's namespaces are resolved and validated before any
    /// of them is evaluated. Evaluation stops at the first namespace that
    /// does not match.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Config`] for an unknown namespace, unknown key
    /// or bad value, and [`MatchError::Source`] if the data source fails.
    pub fn matches(&self, channel: &Channel, policy: &Policy) -> Result<bool, MatchError> {
        for namespace in policy.validate()? {
            if !namespace.evaluate(policy, channel, &self.source)? {
                tracing::trace!(
                    policy = policy.name(),
                    namespace = %namespace,
                    "namespace did not match"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl<S: NodeDataSource> PolicySelector for PolicyMatcher<S> {
    fn select(&self, channel: &Channel) -> Result<&Policy, MatchError> {
        for policy in &self.policies {
            let matched = self.matches(channel, policy)?;
            tracing::debug!(
                chan_id = %channel.chan_id,
                policy = policy.name(),
                matched,
                "evaluated policy"
            );
            if matched {
                tracing::info!(
                    chan_id = %channel.chan_id,
                    policy = policy.name(),
                    "selected policy"
                );
                return Ok(policy);
            }
        }

        tracing::info!(
            chan_id = %channel.chan_id,
            policy = self.default.name(),
            "no policy matched, using default"
        );
        Ok(&self.default)
    }
}
