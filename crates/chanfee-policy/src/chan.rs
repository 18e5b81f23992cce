//! Channel predicates (`chan.*`).
//!
//! | key                 | constraint |
//! |---------------------|------------|
//! | `id`                | channel id is in the list |
//! | `initiator`         | we opened the channel (bool) |
//! | `private`           | channel is unannounced (bool) |
//! | `min_ratio` / `max_ratio` | `local / (local + remote)` within bounds |
//! | `min_capacity` / `max_capacity` | capacity within bounds |
//! | `min_base_fee_msat` / `max_base_fee_msat` | peer's base fee within bounds |
//! | `min_fee_ppm` / `max_fee_ppm` | peer's fee rate within bounds |
//!
//! All bounds are inclusive. Fee keys need the channel's graph edge; when the
//! edge or the peer's side of it is unknown the channel does not match.

use crate::namespace::{channel_ids, split_key, within, ValueKind};
use crate::policy::Policy;
use chanfee_core::error::{ConfigError, MatchError};
use chanfee_core::source::NodeDataSource;
use chanfee_core::types::Channel;

/// Keys recognized in the `chan` namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanKey {
    /// `chan.id`
    Id,
    /// `chan.initiator`
    Initiator,
    /// `chan.private`
    Private,
    /// `chan.max_ratio`
    MaxRatio,
    /// `chan.min_ratio`
    MinRatio,
    /// `chan.max_capacity`
    MaxCapacity,
    /// `chan.min_capacity`
    MinCapacity,
    /// `chan.min_base_fee_msat`
    MinBaseFeeMsat,
    /// `chan.max_base_fee_msat`
    MaxBaseFeeMsat,
    /// `chan.min_fee_ppm`
    MinFeePpm,
    /// `chan.max_fee_ppm`
    MaxFeePpm,
}

impl ChanKey {
    /// All recognized keys.
    pub const ALL: [Self; 11] = [
        Self::Id,
        Self::Initiator,
        Self::Private,
        Self::MaxRatio,
        Self::MinRatio,
        Self::MaxCapacity,
        Self::MinCapacity,
        Self::MinBaseFeeMsat,
        Self::MaxBaseFeeMsat,
        Self::MinFeePpm,
        Self::MaxFeePpm,
    ];

    /// Resolves an attribute name (the part after `chan.`).
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
            Self::Initiator => "initiator",
            Self::Private => "private",
            Self::MaxRatio => "max_ratio",
            Self::MinRatio => "min_ratio",
            Self::MaxCapacity => "max_capacity",
            Self::MinCapacity => "min_capacity",
            Self::MinBaseFeeMsat => "min_base_fee_msat",
            Self::MaxBaseFeeMsat => "max_base_fee_msat",
            Self::MinFeePpm => "min_fee_ppm",
            Self::MaxFeePpm => "max_fee_ppm",
        }
    }

    /// Full dotted key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Id => "chan.id",
            Self::Initiator => "chan.initiator",
            Self::Private => "chan.private",
            Self::MaxRatio => "chan.max_ratio",
            Self::MinRatio => "chan.min_ratio",
            Self::MaxCapacity => "chan.max_capacity",
            Self::MinCapacity => "chan.min_capacity",
            Self::MinBaseFeeMsat => "chan.min_base_fee_msat",
            Self::MaxBaseFeeMsat => "chan.max_base_fee_msat",
            Self::MinFeePpm => "chan.min_fee_ppm",
            Self::MaxFeePpm => "chan.max_fee_ppm",
        }
    }

    /// Returns `true` if evaluating this key needs the channel's graph edge.
    #[must_use]
    pub const fn needs_edge_info(self) -> bool {
        matches!(
            self,
            Self::MinBaseFeeMsat | Self::MaxBaseFeeMsat | Self::MinFeePpm | Self::MaxFeePpm
        )
    }

    const fn kind(self) -> ValueKind {
        match self {
            Self::Id => ValueKind::ChannelIdList,
            Self::Initiator | Self::Private => ValueKind::Bool,
            Self::MaxRatio | Self::MinRatio => ValueKind::Ratio,
            Self::MaxCapacity
            | Self::MinCapacity
            | Self::MinBaseFeeMsat
            | Self::MaxBaseFeeMsat
            | Self::MinFeePpm
            | Self::MaxFeePpm => ValueKind::Amount,
        }
    }
}

/// Checks all `chan.*` keys of `policy` and returns the ones present.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownKey`] for unrecognized attributes and
/// [`ConfigError::InvalidValue`] for values of the wrong type.
pub fn validate(policy: &Policy) -> Result<Vec<ChanKey>, ConfigError> {
    let mut present = Vec::new();
    for key in policy.settings().keys() {
        let Some(("chan", attribute)) = split_key(key) else {
            continue;
        };
        let chan_key =
            ChanKey::parse(attribute).ok_or_else(|| ConfigError::unknown_key(policy.name(), key))?;
        chan_key.kind().check(policy.settings(), key)?;
        present.push(chan_key);
    }
    Ok(present)
}

/// Evaluates the `chan.*` predicates of `policy` against `channel`.
///
/// Keys are validated before anything is evaluated. Constraints are checked
/// cheapest first and the first failing one ends the evaluation; the graph
/// edge is only fetched when a fee key is present.
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

    if let Some(ids) = channel_ids(settings, ChanKey::Id.key())? {
        if !ids.contains(&channel.chan_id) {
            return Ok(false);
        }
    }
    if let Some(initiator) = settings.get_bool(ChanKey::Initiator.key())? {
        if channel.initiator != initiator {
            return Ok(false);
        }
    }
    if let Some(private) = settings.get_bool(ChanKey::Private.key())? {
        if channel.private != private {
            return Ok(false);
        }
    }

    let min_ratio = settings.get_f64(ChanKey::MinRatio.key())?;
    let max_ratio = settings.get_f64(ChanKey::MaxRatio.key())?;
    if min_ratio.is_some() || max_ratio.is_some() {
        match channel.ratio() {
            Some(ratio) if within(ratio, min_ratio, max_ratio) => {}
            Some(_) => return Ok(false),
            None => {
                tracing::debug!(
                    policy = policy.name(),
                    chan_id = %channel.chan_id,
                    "channel has no balance, ratio constraints cannot match"
                );
                return Ok(false);
            }
        }
    }

    if !within(
        channel.capacity,
        settings.get_u64(ChanKey::MinCapacity.key())?,
        settings.get_u64(ChanKey::MaxCapacity.key())?,
    ) {
        return Ok(false);
    }

    // Without a fee key the edge is never fetched, so channels that are not
    // announced yet (or private ones) can still match on local keys.
    if !present.iter().any(|key| key.needs_edge_info()) {
        return Ok(true);
    }

    let Some(edge) = source.chan_info(channel.chan_id)? else {
        tracing::warn!(
            policy = policy.name(),
            chan_id = %channel.chan_id,
            "no graph edge for channel, fee constraints cannot match"
        );
        return Ok(false);
    };
    let own_pubkey = source.own_pubkey()?;
    let Some(peer) = edge.peer_policy(&own_pubkey) else {
        tracing::warn!(
            policy = policy.name(),
            chan_id = %channel.chan_id,
            "peer has not announced a fee policy, fee constraints cannot match"
        );
        return Ok(false);
    };

    Ok(within(
        peer.fee_base_msat,
        settings.get_u64(ChanKey::MinBaseFeeMsat.key())?,
        settings.get_u64(ChanKey::MaxBaseFeeMsat.key())?,
    ) && within(
        peer.fee_rate_milli_msat,
        settings.get_u64(ChanKey::MinFeePpm.key())?,
        settings.get_u64(ChanKey::MaxFeePpm.key())?,
    ))
}
