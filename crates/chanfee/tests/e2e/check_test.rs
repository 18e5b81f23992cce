//! End-to-end tests for `chanfee check` and `chanfee policies`.

#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing
)]

use chanfee::cli::commands::exit_codes::EXIT_CONFIG_ERROR;
use chanfee::cli::commands::{CheckCommand, CheckError, PoliciesCommand};
use chanfee_core::error::ConfigError;

use crate::common::{fixture_path, temp_data_dir, write_policy_file};

#[test]
fn test_check_basic_fixture() {
    let cmd = CheckCommand::new(Some(fixture_path("policies/basic.toml")));
    let out = cmd.execute().expect("basic fixture should validate");

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        [
            "Policy document OK: 4 policies",
            "  1. private",
            "  2. drained",
            "  3. expensive_peers",
            "  4. big_nodes",
            "  default (explicit)",
        ]
    );
}

#[test]
fn test_check_rejects_unknown_key() {
    let cmd = CheckCommand::new(Some(fixture_path("policies/invalid_key.toml")));
    let err = cmd.execute().unwrap_err();
    assert_eq!(err.exit_code(), EXIT_CONFIG_ERROR);
    match err {
        CheckError::Config(ConfigError::UnknownKey { policy, key }) => {
            assert_eq!(policy, "small");
            assert_eq!(key, "chan.bogus_key");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_check_rejects_unknown_namespace() {
    let cmd = CheckCommand::new(Some(fixture_path("policies/unknown_namespace.toml")));
    let err = cmd.execute().unwrap_err();
    assert!(matches!(
        err,
        CheckError::Config(ConfigError::UnknownNamespace { ref namespace, .. }) if namespace == "peer"
    ));
    assert!(err.to_string().contains("unknown namespace 'peer'"));
}

#[test]
fn test_check_rejects_invalid_toml() {
    let dir = temp_data_dir();
    let path = write_policy_file(dir.path(), "[broken\nchan.private = true\n");
    let err = CheckCommand::new(Some(path.clone())).execute().unwrap_err();
    assert!(matches!(
        err,
        CheckError::Config(ConfigError::ParseFailed { .. })
    ));
    assert!(err.to_string().contains(&path.display().to_string()));
}

#[test]
fn test_check_rejects_predicates_in_default() {
    let dir = temp_data_dir();
    let path = write_policy_file(dir.path(), "[default]\nchan.private = true\n");
    let err = CheckCommand::new(Some(path)).execute().unwrap_err();
    assert!(matches!(
        err,
        CheckError::Config(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn test_check_comma_separated_lists() {
    let dir = temp_data_dir();
    let path = write_policy_file(
        dir.path(),
        "[pinned]\nchan.id = \"800000x1x0, 800001x2x1\"\nnode.id = \"02aa, 03bb\"\n",
    );
    let out = CheckCommand::new(Some(path)).execute().unwrap();
    assert!(out.contains("1. pinned"));
    assert!(out.contains("default (implicit)"));
}

#[test]
fn test_policies_listing_follows_document_order() {
    let out = PoliciesCommand::new(Some(fixture_path("policies/basic.toml")))
        .execute()
        .unwrap();
    let headers: Vec<&str> = out.lines().filter(|l| !l.starts_with(' ')).collect();
    assert_eq!(
        headers,
        [
            "1. private",
            "2. drained",
            "3. expensive_peers",
            "4. big_nodes",
            "default"
        ]
    );
    assert!(out.contains("   match: node.min_channels=100 node.min_sats=1000000000"));
    assert!(out.contains("   apply: strategy=static base_fee_msat=1000 fee_ppm=100"));
}
