//! Shared fixtures for the unit tests of this crate.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chanfee_core::error::SourceError;
use chanfee_core::source::{MemoryNodeSource, NodeDataSource};
use chanfee_core::types::{Channel, ChannelEdgeInfo, ChannelId, NodeInfo, RoutingPolicy};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A channel with id 1 to peer `03peer`.
pub fn channel(local: u64, remote: u64, capacity: u64) -> Channel {
    Channel {
        chan_id: ChannelId::new(1),
        remote_pubkey: "03peer".to_string(),
        local_balance: local,
        remote_balance: remote,
        capacity,
        initiator: false,
        private: false,
    }
}

/// A balanced 1M sat channel to `remote`.
pub fn channel_with_peer(remote: &str) -> Channel {
    Channel {
        remote_pubkey: remote.to_string(),
        ..channel(500_000, 500_000, 1_000_000)
    }
}

pub fn edge(
    id: ChannelId,
    node1: &str,
    node2: &str,
    node1_policy: Option<RoutingPolicy>,
    node2_policy: Option<RoutingPolicy>,
) -> ChannelEdgeInfo {
    ChannelEdgeInfo {
        channel_id: id,
        node1_pub: node1.to_string(),
        node2_pub: node2.to_string(),
        node1_policy,
        node2_policy,
    }
}

/// Wraps a [`MemoryNodeSource`] and counts lookups. Without an inner source
/// every call fails.
pub struct CountingSource {
    inner: Option<MemoryNodeSource>,
    node_info_calls: AtomicUsize,
    chan_info_calls: AtomicUsize,
}

impl CountingSource {
    pub fn new(inner: MemoryNodeSource) -> Self {
        Self {
            inner: Some(inner),
            node_info_calls: AtomicUsize::new(0),
            chan_info_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            inner: None,
            node_info_calls: AtomicUsize::new(0),
            chan_info_calls: AtomicUsize::new(0),
        }
    }

    pub fn node_info_calls(&self) -> usize {
        self.node_info_calls.load(Ordering::SeqCst)
    }

    pub fn chan_info_calls(&self) -> usize {
        self.chan_info_calls.load(Ordering::SeqCst)
    }

    fn inner(&self) -> Result<&MemoryNodeSource, SourceError> {
        self.inner
            .as_ref()
            .ok_or_else(|| SourceError::unavailable("connection refused"))
    }
}

impl NodeDataSource for CountingSource {
    fn node_info(&self, pubkey: &str) -> Result<Option<NodeInfo>, SourceError> {
        self.node_info_calls.fetch_add(1, Ordering::SeqCst);
        self.inner()?.node_info(pubkey)
    }

    fn chan_info(&self, chan_id: ChannelId) -> Result<Option<ChannelEdgeInfo>, SourceError> {
        self.chan_info_calls.fetch_add(1, Ordering::SeqCst);
        self.inner()?.chan_info(chan_id)
    }

    fn own_pubkey(&self) -> Result<String, SourceError> {
        self.inner()?.own_pubkey()
    }
}
