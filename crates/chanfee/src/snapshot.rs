//! # Node Snapshots
//!
//! A snapshot is a JSON capture of what a running node would answer: the
//! local node's public key, its open channels, and the parts of the channel
//! graph the policies may query.
//!
//! ## Format
//!
//! ```json
//! {
//!   "own_pubkey": "02aa...",
//!   "channels": [
//!     {
//!       "chan_id": "800000x12x1",
//!       "remote_pubkey": "03bb...",
//!       "local_balance": 300000,
//!       "remote_balance": 700000,
//!       "capacity": 1000000,
//!       "initiator": true,
//!       "private": false
//!     }
//!   ],
//!   "nodes": {
//!     "03bb...": { "num_channels": 42, "total_capacity": 250000000 }
//!   },
//!   "edges": [
//!     {
//!       "channel_id": "800000x12x1",
//!       "node1_pub": "02aa...",
//!       "node2_pub": "03bb...",
//!       "node1_policy": { "fee_base_msat": 1000, "fee_rate_milli_msat": 100 },
//!       "node2_policy": { "fee_base_msat": 0, "fee_rate_milli_msat": 500 }
//!     }
//!   ]
//! }
//! ```
//!
//! `nodes` and `edges` may be omitted. Channel ids are accepted either as
//! integers or in `BLOCKxTXxOUTPUT` form.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chanfee_core::error::SourceError;
use chanfee_core::source::MemoryNodeSource;
use chanfee_core::types::{Channel, ChannelEdgeInfo, ChannelId, NodeInfo};
use serde::{Deserialize, Serialize};

/// Node state captured for offline policy selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Public key of the local node.
    pub own_pubkey: String,

    /// Open channels of the local node.
    pub channels: Vec<Channel>,

    /// Graph node info keyed by public key.
    #[serde(default)]
    pub nodes: HashMap<String, NodeInfo>,

    /// Announced channel edges.
    #[serde(default)]
    pub edges: Vec<ChannelEdgeInfo>,
}

impl NodeSnapshot {
    /// Parses a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ParseFailed`] if the JSON does not describe a
    /// snapshot.
    pub fn from_json_str(content: &str) -> Result<Self, SourceError> {
        serde_json::from_str(content).map_err(|e| SourceError::parse_failed(e.to_string()))
    }

    /// Reads a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the file cannot be read and
    /// [`SourceError::ParseFailed`] if it is not a valid snapshot.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let content = fs::read_to_string(path)
            .map_err(|e| SourceError::io(format!("failed to read {}", path.display()), e))?;

        let snapshot = Self::from_json_str(&content).map_err(|e| match e {
            SourceError::ParseFailed { context } => {
                SourceError::parse_failed(format!("{}: {context}", path.display()))
            }
            other => other,
        })?;

        tracing::debug!(
            path = %path.display(),
            channels = snapshot.channels.len(),
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            "loaded node snapshot"
        );

        Ok(snapshot)
    }

    /// Looks up one of the local channels.
    #[must_use]
    pub fn channel(&self, chan_id: ChannelId) -> Option<&Channel> {
        self.channels.iter().find(|c| c.chan_id == chan_id)
    }

    /// Splits the snapshot into its channels and a data source over the rest.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Channel>, MemoryNodeSource) {
        let mut source = MemoryNodeSource::new(self.own_pubkey);
        for (pubkey, info) in self.nodes {
            source.insert_node(pubkey, info);
        }
        for edge in self.edges {
            source.insert_edge(edge);
        }
        (self.channels, source)
    }
}
