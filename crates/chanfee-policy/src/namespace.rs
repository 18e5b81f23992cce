//! Predicate namespaces and the shared pieces of key validation.
//!
//! A policy key `chan.min_ratio` belongs to namespace `chan`. The set of
//! namespaces is closed: [`Namespace`] is the dispatch table.

use crate::policy::Policy;
use crate::{chan, node};
use chanfee_core::error::{ConfigError, MatchError};
use chanfee_core::source::NodeDataSource;
use chanfee_core::types::{Channel, ChannelId};
use chanfee_core::Settings;
use std::fmt;

/// A predicate namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Channel attributes (`chan.*`).
    Chan,
    /// Remote node attributes (`node.*`).
    Node,
}

impl Namespace {
    /// All namespaces.
    pub const ALL: [Self; 2] = [Self::Chan, Self::Node];

    /// Resolves a namespace prefix.
    #[must_use]
    pub fn parse(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ns| ns.as_str() == prefix)
    }

    /// The key prefix of this namespace.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chan => "chan",
            Self::Node => "node",
        }
    }

    /// Checks every key of `policy` that belongs to this namespace.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] for attributes the namespace does
    /// not know and [`ConfigError::InvalidValue`] for values of the wrong type.
    pub fn validate(self, policy: &Policy) -> Result<(), ConfigError> {
        match self {
            Self::Chan => chan::validate(policy).map(drop),
            Self::Node => node::validate(policy).map(drop),
        }
    }

    /// Evaluates this namespace's predicates for `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Config`] for invalid keys and
    /// [`MatchError::Source`] if the data source fails.
    pub fn evaluate<S: NodeDataSource + ?Sized>(
        self,
        policy: &Policy,
        channel: &Channel,
        source: &S,
    ) -> Result<bool, MatchError> {
        match self {
            Self::Chan => chan::matches(policy, channel, source),
            Self::Node => node::matches(policy, channel, source),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splits `chan.min_ratio` into `("chan", "min_ratio")`.
///
/// Returns `None` for keys without a dot; those are plain settings.
#[must_use]
pub fn split_key(key: &str) -> Option<(&str, &str)> {
    key.split_once('.')
}

/// The type a predicate key expects its value to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueKind {
    ChannelIdList,
    StringList,
    Bool,
    Ratio,
    Amount,
}

impl ValueKind {
    /// Parses the value at `key` as this kind, discarding the result.
    pub(crate) fn check(self, settings: &Settings, key: &str) -> Result<(), ConfigError> {
        match self {
            Self::ChannelIdList => channel_ids(settings, key).map(drop),
            Self::StringList => settings.get_list(key).map(drop),
            Self::Bool => settings.get_bool(key).map(drop),
            Self::Ratio => settings.get_f64(key).map(drop),
            Self::Amount => settings.get_u64(key).map(drop),
        }
    }
}

/// Reads a list of channel ids.
pub(crate) fn channel_ids(
    settings: &Settings,
    key: &str,
) -> Result<Option<Vec<ChannelId>>, ConfigError> {
    let Some(items) = settings.get_list(key)? else {
        return Ok(None);
    };
    items
        .iter()
        .map(|item| {
            item.parse::<ChannelId>()
                .map_err(|e| ConfigError::invalid_value(key, e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Inclusive bounds check; absent bounds do not constrain.
pub(crate) fn within<T: PartialOrd>(value: T, min: Option<T>, max: Option<T>) -> bool {
    min.map_or(true, |min| value >= min) && max.map_or(true, |max| value <= max)
}
