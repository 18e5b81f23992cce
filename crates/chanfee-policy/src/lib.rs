//! # chanfee-policy
//!
//! Policy selection for the `chanfee` channel-fee tool.
//!
//! A policy document lists named policies in priority order. Each policy
//! carries match predicates (`chan.*`, `node.*`) and action settings such as
//! `strategy` or `fee_ppm`. For a given channel the first policy whose
//! predicates all hold is selected; otherwise the `default` policy applies.
//!
//! ## Modules
//!
//! - [`engine`] - The [`PolicyMatcher`] and the [`PolicySelector`] trait
//! - [`policy`] - Named policies
//! - [`namespace`] - Namespace dispatch and shared key validation
//! - [`chan`] - Channel predicates
//! - [`node`] - Remote node predicates
//!
//! ## Example Policy Document
//!
//! ```toml
//! [default]
//! strategy = "static"
//! fee_ppm = 100
//!
//! [drained]
//! chan.max_ratio = 0.2
//! strategy = "static"
//! fee_ppm = 1000
//!
//! [big_peers]
//! node.min_channels = 100
//! node.min_sats = 1_000_000_000
//! strategy = "proportional"
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod chan;
pub mod engine;
pub mod namespace;
pub mod node;
pub mod policy;

#[cfg(test)]
mod testing;

pub use chan::ChanKey;
pub use engine::{PolicyMatcher, PolicySelector};
pub use namespace::Namespace;
pub use node::NodeKey;
pub use policy::{Policy, DEFAULT_POLICY_NAME};
