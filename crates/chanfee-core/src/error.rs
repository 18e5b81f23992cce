//! Error types for chanfee.
//!
//! Errors are organized by where they originate:
//!
//! - [`ConfigError`] - Policy document loading and validation failures
//! - [`SourceError`] - Node data source failures (connectivity, bad snapshots)
//! - [`ChannelIdError`] - Malformed channel identifiers
//! - [`MatchError`] - Top-level error returned by policy selection
//!
//! Only [`ConfigError`] is fatal by nature: a malformed policy is a deployment
//! bug. Missing graph data is not an error at all; the matcher treats it as a
//! non-match.
//!
//! # Example
//!
//! ```rust
//! use chanfee_core::error::{ConfigError, MatchError};
//!
//! fn check(namespace: &str) -> Result<(), MatchError> {
//!     if namespace != "chan" && namespace != "node" {
//!         return Err(ConfigError::unknown_namespace("expensive", namespace).into());
//!     }
//!     Ok(())
//! }
//!
//! let err = check("peer").unwrap_err();
//! assert!(err.is_config());
//! ```

/// Result alias for policy selection.
pub type Result<T> = std::result::Result<T, MatchError>;

/// Top-level error returned by policy selection.
///
/// Wraps the two failure classes that can surface from a `select` call.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// The policy configuration is malformed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The node data source failed.
    #[error("Node data error: {0}")]
    Source(#[from] SourceError),
}

impl MatchError {
    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns `true` if this error came from the node data source.
    #[must_use]
    pub const fn is_source(&self) -> bool {
        matches!(self, Self::Source(_))
    }
}

// ============================================================================
// ConfigError
// ============================================================================

/// Errors that can occur while loading or validating a policy document.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {context}")]
    ParseFailed {
        /// Context about the parsing failure.
        context: String,
    },

    /// A configuration value is invalid.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// The field name with the invalid value.
        field: String,
        /// Description of the invalid value.
        value: String,
    },

    /// A policy key uses a namespace the matcher does not know.
    #[error(
        "unknown namespace '{namespace}' in policy '{policy}' \
         (quote section names containing '.', e.g. [\"{policy}.{namespace}\"])"
    )]
    UnknownNamespace {
        /// The policy containing the key.
        policy: String,
        /// The unrecognized namespace.
        namespace: String,
    },

    /// A policy key is not recognized within its namespace.
    #[error("unknown property '{key}' in policy '{policy}'")]
    UnknownKey {
        /// The policy containing the key.
        policy: String,
        /// The full dotted key.
        key: String,
    },

    /// Home directory could not be determined.
    #[error("could not determine home directory")]
    NoHomeDirectory,

    /// I/O error while reading configuration.
    #[error("{context}: {source}")]
    Io {
        /// What was being done when the error occurred.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create a `FileNotFound` error.
    #[must_use]
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a `ParseFailed` error with context.
    #[must_use]
    pub fn parse_failed(context: impl Into<String>) -> Self {
        Self::ParseFailed {
            context: context.into(),
        }
    }

    /// Create an `InvalidValue` error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create an `UnknownNamespace` error.
    #[must_use]
    pub fn unknown_namespace(policy: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self::UnknownNamespace {
            policy: policy.into(),
            namespace: namespace.into(),
        }
    }

    /// Create an `UnknownKey` error.
    #[must_use]
    pub fn unknown_key(policy: impl Into<String>, key: impl Into<String>) -> Self {
        Self::UnknownKey {
            policy: policy.into(),
            key: key.into(),
        }
    }

    /// Create a `NoHomeDirectory` error.
    #[must_use]
    pub const fn no_home_directory() -> Self {
        Self::NoHomeDirectory
    }

    /// Create an `Io` error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

// ============================================================================
// SourceError
// ============================================================================

/// Errors raised by a node data source.
///
/// These are passed through the matcher unmodified. A lookup that simply
/// finds nothing is not an error; sources return `Ok(None)` for that.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The backing node or service could not be reached.
    #[error("node data source unavailable: {context}")]
    Unavailable {
        /// Context about the failure.
        context: String,
    },

    /// Node data could not be decoded.
    #[error("failed to parse node data: {context}")]
    ParseFailed {
        /// Context about the parsing failure.
        context: String,
    },

    /// I/O error while reading node data.
    #[error("{context}: {source}")]
    Io {
        /// What was being done when the error occurred.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl SourceError {
    /// Create an `Unavailable` error.
    #[must_use]
    pub fn unavailable(context: impl Into<String>) -> Self {
        Self::Unavailable {
            context: context.into(),
        }
    }

    /// Create a `ParseFailed` error.
    #[must_use]
    pub fn parse_failed(context: impl Into<String>) -> Self {
        Self::ParseFailed {
            context: context.into(),
        }
    }

    /// Create an `Io` error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

// ============================================================================
// ChannelIdError
// ============================================================================

/// Errors from parsing a channel identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelIdError {
    /// The text is neither a number nor a `BLOCKxTXxOUTPUT` triple.
    #[error("malformed channel id: '{input}'")]
    Malformed {
        /// The rejected input.
        input: String,
    },

    /// One component of a `BLOCKxTXxOUTPUT` triple is too large.
    #[error("channel id component {component} out of range: {value}")]
    OutOfRange {
        /// Which component overflowed (`block`, `tx` or `output`).
        component: &'static str,
        /// The offending value.
        value: u64,
    },
}

impl ChannelIdError {
    /// Create a `Malformed` error.
    #[must_use]
    pub fn malformed(input: impl Into<String>) -> Self {
        Self::Malformed {
            input: input.into(),
        }
    }
}
