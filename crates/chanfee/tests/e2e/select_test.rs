//! End-to-end tests for `chanfee select`.
//!
//! The `basic` fixtures cover one channel per policy:
//!
//! | channel      | reason                                  | policy            |
//! |--------------|-----------------------------------------|-------------------|
//! | 800000x1x0   | private                                 | `private`         |
//! | 800001x2x1   | ratio 0.1                               | `drained`         |
//! | 800002x3x0   | peer charges 900 ppm                    | `expensive_peers` |
//! | 800003x4x1   | no edge; peer has 150 channels          | `big_nodes`       |
//! | 800004x5x0   | cheap peer, node not in graph           | `default`         |

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::unreadable_literal
)]

use std::path::PathBuf;

use chanfee::cli::commands::exit_codes::{EXIT_CONFIG_ERROR, EXIT_ERROR, EXIT_SOURCE_ERROR};
use chanfee::cli::commands::{SelectCommand, SelectCommandError};
use chanfee::cli::OutputFormat;
use chanfee::snapshot::NodeSnapshot;
use chanfee_core::config_loader::load_from_path;
use chanfee_policy::engine::{PolicyMatcher, PolicySelector};
use proptest::prelude::*;
use serde_json::json;

use crate::common::{
    fixture_path, load_fixture, pubkey, short_channel_id, temp_data_dir, write_policy_file,
    write_snapshot_file,
};

fn basic_select(channel: Option<&str>, format: OutputFormat) -> SelectCommand {
    SelectCommand::new(
        Some(fixture_path("policies/basic.toml")),
        fixture_path("snapshots/basic.json"),
        channel.map(String::from),
        format,
    )
}

fn selected_policies(output: &str) -> Vec<(String, String)> {
    let value: serde_json::Value = serde_json::from_str(output).expect("valid JSON output");
    value
        .as_array()
        .expect("array output")
        .iter()
        .map(|s| {
            (
                s["chan_id"].as_str().unwrap().to_string(),
                s["policy"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_select_basic_fixture_json() {
    let out = basic_select(None, OutputFormat::Json).execute().unwrap();
    let selected = selected_policies(&out);
    let expected = [
        ("800000x1x0", "private"),
        ("800001x2x1", "drained"),
        ("800002x3x0", "expensive_peers"),
        ("800003x4x1", "big_nodes"),
        ("800004x5x0", "default"),
    ];
    assert_eq!(selected.len(), expected.len());
    for ((chan, policy), (want_chan, want_policy)) in selected.iter().zip(expected) {
        assert_eq!(chan, want_chan);
        assert_eq!(policy, want_policy);
    }
}

#[test]
fn test_select_json_carries_settings() {
    let out = basic_select(Some("800003x4x1"), OutputFormat::Json)
        .execute()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    let selection = &value[0];
    assert_eq!(selection["policy"], "big_nodes");
    assert_eq!(selection["ratio"], 0.5);
    assert_eq!(selection["settings"]["strategy"], "proportional");
    assert_eq!(selection["settings"]["node.min_channels"], 100);
    assert_eq!(selection["settings"]["max_fee_ppm"], 2000);
}

#[test]
fn test_select_text_single_channel() {
    let out = basic_select(Some("800001x2x1"), OutputFormat::Text)
        .execute()
        .unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("800001x2x1  03b2"));
    assert!(lines[0].contains("ratio=0.100  drained  strategy=static fee_ppm=1000"));
}

#[test]
fn test_select_channel_by_decimal_id() {
    let id = (800_002_u64 << 40) | (3 << 16);
    let out = basic_select(Some(&id.to_string()), OutputFormat::Json)
        .execute()
        .unwrap();
    assert_eq!(
        selected_policies(&out),
        [("800002x3x0".to_string(), "expensive_peers".to_string())]
    );
}

#[test]
fn test_select_is_idempotent() {
    let first = basic_select(None, OutputFormat::Json).execute().unwrap();
    let second = basic_select(None, OutputFormat::Json).execute().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_matcher_over_fixtures_directly() {
    let document = load_from_path(&fixture_path("policies/basic.toml")).unwrap();
    let snapshot = NodeSnapshot::load(&fixture_path("snapshots/basic.json")).unwrap();
    let (channels, source) = snapshot.into_parts();
    let matcher = PolicyMatcher::new(&document, source).unwrap();

    for channel in &channels {
        let policy = matcher.select(channel).unwrap();
        // Selection returns a policy owned by the matcher.
        assert!(
            matcher.policies().iter().any(|p| std::ptr::eq(p, policy))
                || std::ptr::eq(policy, matcher.default_policy())
        );
    }
}

#[test]
fn test_earlier_policy_wins_over_later_match() {
    // 800000x1x0 is private, but the catch-all comes first.
    let dir = temp_data_dir();
    let path = write_policy_file(
        dir.path(),
        "[catch_all]\nstrategy = \"static\"\n\n[private]\nchan.private = true\n",
    );
    let cmd = SelectCommand::new(
        Some(path),
        fixture_path("snapshots/basic.json"),
        Some("800000x1x0".to_string()),
        OutputFormat::Json,
    );
    let out = cmd.execute().unwrap();
    assert_eq!(selected_policies(&out)[0].1, "catch_all");
}

#[test]
fn test_fee_policy_falls_through_without_edge() {
    let dir = temp_data_dir();
    let path = write_policy_file(
        dir.path(),
        "[any_fee]\nchan.max_fee_ppm = 1000000\n\n[fallback]\nchan.min_capacity = 1\n",
    );
    let cmd = SelectCommand::new(
        Some(path),
        fixture_path("snapshots/basic.json"),
        Some("800003x4x1".to_string()),
        OutputFormat::Json,
    );
    let out = cmd.execute().unwrap();
    assert_eq!(selected_policies(&out)[0].1, "fallback");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unknown_key_fails_before_snapshot_is_read() {
    let cmd = SelectCommand::new(
        Some(fixture_path("policies/invalid_key.toml")),
        PathBuf::from("/nonexistent/snapshot.json"),
        None,
        OutputFormat::Text,
    );
    let err = cmd.execute().unwrap_err();
    assert_eq!(err.exit_code(), EXIT_CONFIG_ERROR);
}

#[test]
fn test_missing_snapshot() {
    let cmd = basic_select(None, OutputFormat::Text);
    let cmd = SelectCommand {
        snapshot: PathBuf::from("/nonexistent/snapshot.json"),
        ..cmd
    };
    let err = cmd.execute().unwrap_err();
    assert!(matches!(err, SelectCommandError::Snapshot(_)));
    assert_eq!(err.exit_code(), EXIT_SOURCE_ERROR);
}

#[test]
fn test_malformed_snapshot() {
    let dir = temp_data_dir();
    let snapshot = write_snapshot_file(dir.path(), &json!({ "channels": [] }));
    let cmd = SelectCommand::new(
        Some(fixture_path("policies/basic.toml")),
        snapshot,
        None,
        OutputFormat::Text,
    );
    let err = cmd.execute().unwrap_err();
    assert_eq!(err.exit_code(), EXIT_SOURCE_ERROR);
}

#[test]
fn test_unknown_channel() {
    let err = basic_select(Some("1x1x1"), OutputFormat::Text)
        .execute()
        .unwrap_err();
    assert!(matches!(err, SelectCommandError::ChannelNotFound(_)));
    assert_eq!(err.exit_code(), EXIT_ERROR);
}

#[test]
fn test_snapshot_fixture_shape() {
    let snapshot = load_fixture("snapshots/basic.json").unwrap();
    assert_eq!(snapshot["channels"].as_array().unwrap().len(), 5);
    assert_eq!(snapshot["own_pubkey"].as_str().unwrap().len(), 66);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_node_id_membership(peer in pubkey(), other in pubkey(), chan in short_channel_id()) {
        prop_assume!(peer != other);
        let dir = temp_data_dir();
        let policy = write_policy_file(
            dir.path(),
            &format!("[friends]\nnode.id = [\"{peer}\"]\n"),
        );
        let snapshot = write_snapshot_file(dir.path(), &json!({
            "own_pubkey": "02".to_string() + &"0".repeat(64),
            "channels": [
                {
                    "chan_id": chan,
                    "remote_pubkey": peer,
                    "local_balance": 1, "remote_balance": 1, "capacity": 2
                },
                {
                    "chan_id": 1,
                    "remote_pubkey": other,
                    "local_balance": 1, "remote_balance": 1, "capacity": 2
                }
            ]
        }));

        let out = SelectCommand::new(Some(policy), snapshot, None, OutputFormat::Json)
            .execute()
            .unwrap();
        let selected = selected_policies(&out);
        prop_assert_eq!(selected[0].1.as_str(), "friends");
        prop_assert_eq!(selected[1].1.as_str(), "default");
    }
}
