//! Core data types for channel policy selection.
//!
//! - [`ChannelId`] - Canonical numeric channel identifier and its text format
//! - [`Channel`] - A local channel, as handed to the matcher
//! - [`NodeInfo`] - Aggregate facts about a remote node
//! - [`ChannelEdgeInfo`] - The announced graph edge for a channel
//! - [`RoutingPolicy`] - One endpoint's advertised fee terms
//!
//! # Example
//!
//! ```rust
//! use chanfee_core::types::{Channel, ChannelId};
//!
//! let chan_id: ChannelId = "700000x1234x1".parse().unwrap();
//! let channel = Channel {
//!     chan_id,
//!     remote_pubkey: "02aa".to_string(),
//!     local_balance: 300_000,
//!     remote_balance: 700_000,
//!     capacity: 1_000_000,
//!     initiator: true,
//!     private: false,
//! };
//!
//! assert_eq!(channel.ratio(), Some(0.3));
//! assert_eq!(chan_id.to_string(), "700000x1234x1");
//! ```

use crate::error::ChannelIdError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const BLOCK_LIMIT: u64 = 1 << 24;
const TX_LIMIT: u64 = 1 << 24;
const OUTPUT_LIMIT: u64 = 1 << 16;

// ============================================================================
// ChannelId
// ============================================================================

/// Canonical numeric channel identifier.
///
/// The text form is either the plain decimal integer or the short channel id
/// triple `BLOCKxTXxOUTPUT` (`:` is accepted as separator too), packed as
/// `block << 40 | tx << 16 | output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "ChannelIdRepr", into = "u64")]
pub struct ChannelId(u64);

impl ChannelId {
    /// Wraps a raw numeric channel id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Builds a channel id from its short channel id components.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelIdError::OutOfRange`] if a component does not fit
    /// (block and tx are 24 bits, output is 16 bits).
    pub const fn from_parts(block: u64, tx: u64, output: u64) -> Result<Self, ChannelIdError> {
        if block >= BLOCK_LIMIT {
            return Err(ChannelIdError::OutOfRange {
                component: "block",
                value: block,
            });
        }
        if tx >= TX_LIMIT {
            return Err(ChannelIdError::OutOfRange {
                component: "tx",
                value: tx,
            });
        }
        if output >= OUTPUT_LIMIT {
            return Err(ChannelIdError::OutOfRange {
                component: "output",
                value: output,
            });
        }
        Ok(Self((block << 40) | (tx << 16) | output))
    }

    /// Returns the raw numeric id.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Funding block height.
    #[must_use]
    pub const fn block(self) -> u64 {
        self.0 >> 40
    }

    /// Funding transaction index within the block.
    #[must_use]
    pub const fn tx_index(self) -> u64 {
        (self.0 >> 16) & (TX_LIMIT - 1)
    }

    /// Funding output index.
    #[must_use]
    pub const fn output_index(self) -> u64 {
        self.0 & (OUTPUT_LIMIT - 1)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{}",
            self.block(),
            self.tx_index(),
            self.output_index()
        )
    }
}

impl FromStr for ChannelId {
    type Err = ChannelIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // One separator style per id; `1x2:3` is rejected.
        let separator = if trimmed.contains('x') { 'x' } else { ':' };
        let parts: Vec<&str> = trimmed.split(separator).collect();

        match parts.as_slice() {
            [raw] => parse_digits(raw, trimmed).map(Self),
            [block, tx, output] => Self::from_parts(
                parse_digits(block, trimmed)?,
                parse_digits(tx, trimmed)?,
                parse_digits(output, trimmed)?,
            ),
            _ => Err(ChannelIdError::malformed(trimmed)),
        }
    }
}

fn parse_digits(part: &str, input: &str) -> Result<u64, ChannelIdError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ChannelIdError::malformed(input));
    }
    part.parse().map_err(|_| ChannelIdError::malformed(input))
}

impl From<ChannelId> for u64 {
    fn from(id: ChannelId) -> Self {
        id.0
    }
}

/// Wire representation accepted for channel ids in snapshots.
#[derive(Deserialize)]
#[serde(untagged)]
enum ChannelIdRepr {
    Number(u64),
    Text(String),
}

impl TryFrom<ChannelIdRepr> for ChannelId {
    type Error = ChannelIdError;

    fn try_from(repr: ChannelIdRepr) -> Result<Self, Self::Error> {
        match repr {
            ChannelIdRepr::Number(raw) => Ok(Self(raw)),
            ChannelIdRepr::Text(text) => text.parse(),
        }
    }
}

// ============================================================================
// Channel
// ============================================================================

/// A channel owned by the local node.
///
/// Amounts are in satoshis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Channel identifier.
    pub chan_id: ChannelId,
    /// Public key of the remote peer.
    pub remote_pubkey: String,
    /// Local balance.
    pub local_balance: u64,
    /// Remote balance.
    pub remote_balance: u64,
    /// Total channel capacity.
    pub capacity: u64,
    /// Whether the local node opened the channel.
    #[serde(default)]
    pub initiator: bool,
    /// Whether the channel is unannounced.
    #[serde(default)]
    pub private: bool,
}

impl Channel {
    /// Local share of the combined balance, `local / (local + remote)`.
    ///
    /// Returns `None` when both balances are zero.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> Option<f64> {
        let total = u128::from(self.local_balance) + u128::from(self.remote_balance);
        if total == 0 {
            return None;
        }
        Some(self.local_balance as f64 / total as f64)
    }
}

// ============================================================================
// Graph data
// ============================================================================

/// Aggregate information about a node in the channel graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    /// Number of public channels the node has.
    pub num_channels: u64,
    /// Sum of the capacities of those channels, in satoshis.
    pub total_capacity: u64,
}

/// Fee terms advertised by one side of a channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingPolicy {
    /// Base fee in millisatoshis.
    pub fee_base_msat: u64,
    /// Proportional fee in parts per million.
    pub fee_rate_milli_msat: u64,
}

/// The announced graph edge for a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEdgeInfo {
    /// Channel identifier.
    pub channel_id: ChannelId,
    /// First endpoint.
    pub node1_pub: String,
    /// Second endpoint.
    pub node2_pub: String,
    /// Policy announced by `node1_pub`, if any.
    #[serde(default)]
    pub node1_policy: Option<RoutingPolicy>,
    /// Policy announced by `node2_pub`, if any.
    #[serde(default)]
    pub node2_policy: Option<RoutingPolicy>,
}

impl ChannelEdgeInfo {
    /// Returns the policy announced by the endpoint that is not `own_pubkey`.
    ///
    /// When `own_pubkey` is `node2_pub` the peer is `node1`; otherwise the
    /// peer is taken to be `node2`.
    #[must_use]
    pub fn peer_policy(&self, own_pubkey: &str) -> Option<&RoutingPolicy> {
        if self.node2_pub == own_pubkey {
            self.node1_policy.as_ref()
        } else {
            self.node2_policy.as_ref()
        }
    }
}
