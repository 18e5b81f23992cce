//! # chanfee-core
//!
//! Core types, traits, and error definitions shared by the chanfee crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`types`] - Channel and graph data ([`Channel`], [`ChannelId`], [`NodeInfo`], [`ChannelEdgeInfo`])
//! - [`config`] - Policy documents and typed setting access ([`PolicyDocument`], [`Settings`])
//! - [`config_loader`] - Reading policy documents from disk
//! - [`source`] - The [`NodeDataSource`] trait and an in-memory implementation
//!
//! ## Example
//!
//! ```rust
//! use chanfee_core::{ConfigurationSource, PolicyDocument};
//!
//! let doc = PolicyDocument::from_toml_str(r#"
//! [default]
//! fee_ppm = 10
//!
//! [big-peers]
//! node.min_sats = 1000000000
//! fee_ppm = 50
//! "#).unwrap();
//!
//! let names: Vec<String> = doc
//!     .sections()
//!     .unwrap()
//!     .into_iter()
//!     .map(|s| s.name().to_string())
//!     .collect();
//! assert_eq!(names, ["default", "big-peers"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod config_loader;
pub mod error;
pub mod source;
pub mod types;

pub use config::{ConfigurationSource, PolicyDocument, Section, SettingValue, Settings};
pub use config_loader::{expand_path, load_from_path, ConfigLoader};
pub use error::{ChannelIdError, ConfigError, MatchError, Result, SourceError};
pub use source::{MemoryNodeSource, NodeDataSource};
pub use types::{Channel, ChannelEdgeInfo, ChannelId, NodeInfo, RoutingPolicy};
