//! # Test Utilities for `chanfee`
//!
//! Shared helpers for integration tests.
//!
//! ## Functions
//!
//! - [`fixture_path`] - Absolute path of a file under `tests/fixtures/`
//! - [`load_fixture`] - Load a JSON fixture file
//! - [`temp_data_dir`] - Create an isolated temporary directory for test data
//! - [`write_policy_file`] - Write a policy document into a directory
//!
//! ## Proptest Strategies
//!
//! - [`pubkey`] - Generate compressed public keys in hex
//! - [`short_channel_id`] - Generate `BLOCKxTXxOUTPUT` channel ids

#![allow(dead_code)]
// Allow expect() in test utilities since panicking on setup failures is acceptable in tests
#![allow(clippy::expect_used)]

use std::fmt::Write as FmtWrite;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use tempfile::TempDir;

/// Error type for fixture loading operations.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    /// The fixture file could not be found.
    #[error("Fixture not found: {0}")]
    NotFound(String),

    /// The fixture file could not be read.
    #[error("Failed to read fixture: {0}")]
    ReadError(#[from] std::io::Error),

    /// The fixture JSON could not be parsed.
    #[error("Failed to parse fixture JSON: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Get the path to the fixtures directory.
///
/// `CARGO_MANIFEST_DIR` points at `crates/chanfee`; fixtures live in the
/// workspace root's `tests/fixtures`.
fn fixtures_dir() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let manifest_path = PathBuf::from(manifest_dir);

    manifest_path
        .parent() // crates
        .and_then(|p| p.parent()) // workspace root
        .map_or_else(
            || PathBuf::from("tests/fixtures"),
            |p| p.join("tests").join("fixtures"),
        )
}

/// Absolute path of a fixture, e.g. `fixture_path("policies/basic.toml")`.
#[must_use]
pub fn fixture_path(path: &str) -> PathBuf {
    fixtures_dir().join(path)
}

/// Load a JSON fixture file from the fixtures directory.
///
/// # Examples
///
/// ```ignore
/// use crate::common::load_fixture;
///
/// let snapshot = load_fixture("snapshots/basic.json")?;
/// let own = snapshot["own_pubkey"].as_str().unwrap();
/// ```
pub fn load_fixture(path: &str) -> Result<serde_json::Value, FixtureError> {
    let fixture_path = fixture_path(path);

    if !fixture_path.exists() {
        return Err(FixtureError::NotFound(fixture_path.display().to_string()));
    }

    let content = std::fs::read_to_string(&fixture_path)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    Ok(value)
}

/// Create a temporary directory for test data.
///
/// The directory is removed when the returned `TempDir` is dropped.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
pub fn temp_data_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("chanfee-test-")
        .tempdir()
        .expect("Failed to create temporary directory for test")
}

/// Write `content` to `policies.toml` inside `dir` and return its path.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_policy_file(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("policies.toml");
    std::fs::write(&path, content).expect("Failed to write policy file");
    path
}

/// Write a snapshot JSON value into `dir` and return its path.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_snapshot_file(dir: &Path, snapshot: &serde_json::Value) -> PathBuf {
    let path = dir.join("snapshot.json");
    let content = serde_json::to_string_pretty(snapshot).expect("Failed to serialize snapshot");
    std::fs::write(&path, content).expect("Failed to write snapshot file");
    path
}

// =============================================================================
// Proptest Strategies
// =============================================================================

fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(hex, "{b:02x}");
    }
    hex
}

/// Generate a compressed secp256k1 public key in hex (66 characters).
pub fn pubkey() -> impl Strategy<Value = String> {
    (
        prop::bool::ANY,
        prop::collection::vec(prop::num::u8::ANY, 32),
    )
        .prop_map(|(odd, bytes)| {
            let prefix = if odd { "03" } else { "02" };
            format!("{prefix}{}", bytes_to_hex(&bytes))
        })
}

/// Generate a short channel id in `BLOCKxTXxOUTPUT` form.
pub fn short_channel_id() -> impl Strategy<Value = String> {
    (0_u64..(1 << 24), 0_u64..(1 << 24), 0_u64..(1 << 16))
        .prop_map(|(block, tx, output)| format!("{block}x{tx}x{output}"))
}
