//! Remote node predicates (`node.*`).
//!
//! `node.id` restricts the remote public key to a list. The remaining keys
//! bound the remote node's channel count and total capacity, inclusively,
//! and need a node lookup; an unknown node does not match.

use crate::namespace::{split_key, within, ValueKind};
use crate::policy::Policy;
use chanfee_core::error::{ConfigError, MatchError};
use chanfee_core::source::NodeDataSource;
use chanfee_core::types::Channel;

/// Keys recognized in the `node` namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKey {
    /// `node.id`
    Id,
    /// `node.min_channels`
    MinChannels,
    /// `node.max_channels`
    MaxChannels,
    /// `node.min_sats`
    MinSats,
    /// `node.max_sats`
    MaxSats,
}

impl NodeKey {
    /// All recognized keys.
    pub const ALL: [Self; 5] = [
        Self::Id,
        Self::MinChannels,
        Self::MaxChannels,
        Self::MinSats,
        Self::MaxSats,
    ];

    /// Resolves an attribute name (the part after `node.`).
    #[must_use]
    pub fn parse(attribute: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.attribute() == attribute)
    }

    /// Attribute name without the namespace.
    #[must_use]
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::MinChannels => "min_channels",
            Self::MaxChannels => "max_channels",
            Self::MinSats => "min_sats",
            Self::MaxSats => "max_sats",
        }
    }

    /// Full dotted key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Id => "node.id",
            Self::MinChannels => "node.min_channels",
            Self::MaxChannels => "node.max_channels",
            Self::MinSats => "node.min_sats",
            Self::MaxSats => "node.max_sats",
        }
    }

    /// Returns `true` if evaluating this key needs a node lookup.
    #[must_use]
    pub const fn needs_node_info(self) -> bool {
        !matches!(self, Self::Id)
    }

    const fn kind(self) -> ValueKind {
        match self {
            Self::Id => ValueKind::StringList,
            Self::MinChannels | Self::MaxChannels | Self::MinSats | Self::MaxSats => {
                ValueKind::Amount
            }
        }
    }
}

/// Checks all `node.*` keys of `policy` and returns the ones present.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownKey`] for unrecognized attributes and
/// [`ConfigError::InvalidValue`] for values of the wrong type.
pub fn validate(policy: &Policy) -> Result<Vec<NodeKey>, ConfigError> {
    let mut present = Vec::new();
    for key in policy.settings().keys() {
        let Some(("node", attribute)) = split_key(key) else {
            continue;
        };
        let node_key =
            NodeKey::parse(attribute).ok_or_else(|| ConfigError::unknown_key(policy.name(), key))?;
        node_key.kind().check(policy.settings(), key)?;
        present.push(node_key);
    }
    Ok(present)
}

/// Evaluates the `node.*` predicates of `policy` against `channel`'s peer.
///
/// # Errors
///
/// Returns [`MatchError::Config`] for invalid keys and [`MatchError::Source`]
/// if the data source fails.
pub fn matches<S: NodeDataSource + ?Sized>(
    policy: &Policy,
    channel: &Channel,
    source: &S,
) -> Result<bool, MatchError> {
    let present = validate(policy)?;
    let settings = policy.settings();

    if let Some(ids) = settings.get_list(NodeKey::Id.key())? {
        if !ids.iter().any(|id| *id == channel.remote_pubkey) {
            return Ok(false);
        }
    }

    if !present.iter().any(|key| key.needs_node_info()) {
        return Ok(true);
    }

    let Some(info) = source.node_info(&channel.remote_pubkey)? else {
        tracing::warn!(
            policy = policy.name(),
            pubkey = %channel.remote_pubkey,
            "remote node not in graph, node constraints cannot match"
        );
        return Ok(false);
    };

    Ok(within(
        info.num_channels,
        settings.get_u64(NodeKey::MinChannels.key())?,
        settings.get_u64(NodeKey::MaxChannels.key())?,
    ) && within(
        info.total_capacity,
        settings.get_u64(NodeKey::MinSats.key())?,
        settings.get_u64(NodeKey::MaxSats.key())?,
    ))
}
