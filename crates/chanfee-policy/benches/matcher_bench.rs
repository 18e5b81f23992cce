//! Performance benchmarks for chanfee-policy selection.
//!
//! This module benchmarks:
//! - Selection with purely local `chan` predicates
//! - Selection that falls through many policies to the default
//! - Predicates that need graph lookups

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use chanfee_core::config::{PolicyDocument, Settings};
use chanfee_core::source::MemoryNodeSource;
use chanfee_core::types::{Channel, ChannelEdgeInfo, ChannelId, NodeInfo, RoutingPolicy};
use chanfee_policy::engine::{PolicyMatcher, PolicySelector};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

const OWN: &str = "02own";
const PEER: &str = "03peer";

/// Helper to create a test channel.
fn create_channel(local: u64, remote: u64) -> Channel {
    Channel {
        chan_id: ChannelId::from_parts(800_000, 1, 0).unwrap(),
        remote_pubkey: PEER.to_string(),
        local_balance: local,
        remote_balance: remote,
        capacity: local + remote,
        initiator: true,
        private: false,
    }
}

/// Helper to create a source that knows the peer and the channel edge.
fn create_source() -> MemoryNodeSource {
    MemoryNodeSource::new(OWN)
        .with_node(
            PEER,
            NodeInfo {
                num_channels: 120,
                total_capacity: 2_000_000_000,
            },
        )
        .with_edge(ChannelEdgeInfo {
            channel_id: ChannelId::from_parts(800_000, 1, 0).unwrap(),
            node1_pub: OWN.to_string(),
            node2_pub: PEER.to_string(),
            node1_policy: Some(RoutingPolicy::default()),
            node2_policy: Some(RoutingPolicy {
                fee_base_msat: 1000,
                fee_rate_milli_msat: 250,
            }),
        })
}

/// Benchmark selection when the first policy matches on local data.
fn benchmark_select_first_match(c: &mut Criterion) {
    let document = PolicyDocument::new()
        .with_section("drained", Settings::new().with("chan.max_ratio", 0.2))
        .with_section("default", Settings::new().with("strategy", "static"));
    let matcher = PolicyMatcher::new(&document, create_source()).unwrap();
    let channel = create_channel(100_000, 900_000);

    c.bench_function("matcher/first_match_local", |b| {
        b.iter(|| {
            let policy = matcher.select(black_box(&channel)).unwrap();
            black_box(policy)
        });
    });
}

/// Benchmark selection falling through N non-matching policies.
fn benchmark_select_fall_through(c: &mut Criterion) {
    let mut group = c.benchmark_group("matcher/fall_through");

    for count in [1_usize, 10, 100] {
        let mut document = PolicyDocument::new();
        for i in 0..count {
            document = document.with_section(
                format!("policy_{i:03}"),
                Settings::new()
                    .with("chan.private", true)
                    .with("chan.min_capacity", 1_i64),
            );
        }
        let matcher = PolicyMatcher::new(&document, create_source()).unwrap();
        let channel = create_channel(500_000, 500_000);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let policy = matcher.select(black_box(&channel)).unwrap();
                black_box(policy)
            });
        });
    }

    group.finish();
}

/// Benchmark predicates that query the data source.
fn benchmark_select_with_lookups(c: &mut Criterion) {
    let document = PolicyDocument::new().with_section(
        "big_expensive_peer",
        Settings::new()
            .with("node.min_channels", 100_i64)
            .with("chan.min_fee_ppm", 200_i64)
            .with("chan.max_base_fee_msat", 2000_i64),
    );
    let matcher = PolicyMatcher::new(&document, create_source()).unwrap();
    let channel = create_channel(500_000, 500_000);

    c.bench_function("matcher/graph_lookups", |b| {
        b.iter(|| {
            let policy = matcher.select(black_box(&channel)).unwrap();
            black_box(policy)
        });
    });
}

criterion_group!(
    benches,
    benchmark_select_first_match,
    benchmark_select_fall_through,
    benchmark_select_with_lookups
);
criterion_main!(benches);
