//! Access to live node and channel graph data.
//!
//! The matcher never talks to a node daemon directly. It asks a
//! [`NodeDataSource`] for whatever facts a predicate needs, once per
//! predicate evaluation, with no caching in between.
//!
//! [`MemoryNodeSource`] is a fixed, in-memory source used for snapshots and
//! tests.
//!
//! # Example
//!
//! ```
//! use chanfee_core::source::{MemoryNodeSource, NodeDataSource};
//! use chanfee_core::types::NodeInfo;
//!
//! let source = MemoryNodeSource::new("02me")
//!     .with_node("03peer", NodeInfo { num_channels: 12, total_capacity: 50_000_000 });
//!
//! assert_eq!(source.node_info("03peer").unwrap().unwrap().num_channels, 12);
//! assert!(source.node_info("03unknown").unwrap().is_none());
//! ```

use crate::error::SourceError;
use crate::types::{ChannelEdgeInfo, ChannelId, NodeInfo};
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only access to node and channel graph facts.
///
/// Implementations must be `Send + Sync`: one matcher may serve concurrent
/// `select` calls. Timeouts and retries are the implementation's business.
///
/// `Ok(None)` means "not found" and is not an error. `Err` is reserved for
/// failures of the source itself and is handed back to the caller as is.
pub trait NodeDataSource: Send + Sync {
    /// Looks up aggregate info for a node.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the source cannot be queried.
    fn node_info(&self, pubkey: &str) -> Result<Option<NodeInfo>, SourceError>;

    /// Looks up the announced edge for a channel.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the source cannot be queried.
    fn chan_info(&self, chan_id: ChannelId) -> Result<Option<ChannelEdgeInfo>, SourceError>;

    /// Returns the local node's public key.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the source cannot be queried.
    fn own_pubkey(&self) -> Result<String, SourceError>;
}

impl<T: NodeDataSource + ?Sized> NodeDataSource for &T {
    fn node_info(&self, pubkey: &str) -> Result<Option<NodeInfo>, SourceError> {
        (**self).node_info(pubkey)
    }

    fn chan_info(&self, chan_id: ChannelId) -> Result<Option<ChannelEdgeInfo>, SourceError> {
        (**self).chan_info(chan_id)
    }

    fn own_pubkey(&self) -> Result<String, SourceError> {
        (**self).own_pubkey()
    }
}

impl<T: NodeDataSource + ?Sized> NodeDataSource for Arc<T> {
    fn node_info(&self, pubkey: &str) -> Result<Option<NodeInfo>, SourceError> {
        (**self).node_info(pubkey)
    }

    fn chan_info(&self, chan_id: ChannelId) -> Result<Option<ChannelEdgeInfo>, SourceError> {
        (**self).chan_info(chan_id)
    }

    fn own_pubkey(&self) -> Result<String, SourceError> {
        (**self).own_pubkey()
    }
}

/// A node data source backed by fixed maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryNodeSource {
    own_pubkey: String,
    nodes: HashMap<String, NodeInfo>,
    edges: HashMap<ChannelId, ChannelEdgeInfo>,
}

impl MemoryNodeSource {
    /// Creates an empty source for the node `own_pubkey`.
    #[must_use]
    pub fn new(own_pubkey: impl Into<String>) -> Self {
        Self {
            own_pubkey: own_pubkey.into(),
            nodes: HashMap::new(),
            edges: HashMap::new(),
        }
    }

    /// Adds or replaces node info.
    #[must_use]
    pub fn with_node(mut self, pubkey: impl Into<String>, info: NodeInfo) -> Self {
        self.insert_node(pubkey, info);
        self
    }

    /// Adds or replaces a channel edge, keyed by its channel id.
    #[must_use]
    pub fn with_edge(mut self, edge: ChannelEdgeInfo) -> Self {
        self.insert_edge(edge);
        self
    }

    /// Adds or replaces node info.
    pub fn insert_node(&mut self, pubkey: impl Into<String>, info: NodeInfo) {
        self.nodes.insert(pubkey.into(), info);
    }

    /// Adds or replaces a channel edge.
    pub fn insert_edge(&mut self, edge: ChannelEdgeInfo) {
        self.edges.insert(edge.channel_id, edge);
    }

    /// Number of known nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of known edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl NodeDataSource for MemoryNodeSource {
    fn node_info(&self, pubkey: &str) -> Result<Option<NodeInfo>, SourceError> {
        Ok(self.nodes.get(pubkey).copied())
    }

    fn chan_info(&self, chan_id: ChannelId) -> Result<Option<ChannelEdgeInfo>, SourceError> {
        Ok(self.edges.get(&chan_id).cloned())
    }

    fn own_pubkey(&self) -> Result<String, SourceError> {
        Ok(self.own_pubkey.clone())
    }
}
