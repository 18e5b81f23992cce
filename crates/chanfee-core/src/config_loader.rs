//! Policy document loading from the filesystem.
//!
//! # Default Location
//!
//! Policies are read from `~/.chanfee/policies.toml` unless a path is given.
//!
//! # Examples
//!
//! ```no_run
//! use chanfee_core::config_loader::ConfigLoader;
//!
//! let loader = ConfigLoader::new().expect("failed to create loader");
//! let document = loader.load_required().expect("failed to load policies");
//! ```
//!
//! ```no_run
//! use chanfee_core::config_loader::load_from_path;
//! use std::path::Path;
//!
//! let document = load_from_path(Path::new("/etc/chanfee/policies.toml"))
//!     .expect("failed to load policies");
//! ```

use crate::config::PolicyDocument;
use crate::error::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};

/// The default policy file name.
const CONFIG_FILE_NAME: &str = "policies.toml";

/// The default base directory name within the home directory.
const BASE_DIR_NAME: &str = ".chanfee";

/// Locates and reads policy documents.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Base directory for chanfee files (default: ~/.chanfee).
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a loader rooted at `~/.chanfee`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHomeDirectory`] if the home directory cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        let base_dir = default_base_dir()?;
        Ok(Self { base_dir })
    }

    /// Creates a loader with a custom base directory.
    #[must_use]
    pub const fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Path of the policy file.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE_NAME)
    }

    /// Base directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns `true` if the policy file exists.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.config_path().exists()
    }

    /// Loads the policy file, or an empty document if there is none.
    ///
    /// An empty document yields a matcher with only the implicit default
    /// policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] for invalid TOML and
    /// [`ConfigError::Io`] if the file cannot be read.
    pub fn load(&self) -> Result<PolicyDocument, ConfigError> {
        let path = self.config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no policy file, using empty document");
            return Ok(PolicyDocument::new());
        }
        load_from_path(&path)
    }

    /// Loads the policy file, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileNotFound`] if the file is missing, plus the
    /// errors of [`load`](Self::load).
    pub fn load_required(&self) -> Result<PolicyDocument, ConfigError> {
        load_from_path(&self.config_path())
    }
}

/// Loads a policy document from a specific path.
///
/// # Errors
///
/// Returns [`ConfigError::FileNotFound`] if `path` does not exist,
/// [`ConfigError::Io`] if it cannot be read, and [`ConfigError::ParseFailed`]
/// or [`ConfigError::InvalidValue`] if its content is not a valid document.
pub fn load_from_path(path: &Path) -> Result<PolicyDocument, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::file_not_found(path.display().to_string()));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::io(format!("failed to read {}", path.display()), e))?;

    let document = PolicyDocument::from_toml_str(&content).map_err(|e| match e {
        ConfigError::ParseFailed { context } => {
            ConfigError::parse_failed(format!("{}: {context}", path.display()))
        }
        other => other,
    })?;

    tracing::debug!(
        path = %path.display(),
        sections = document.len(),
        "loaded policy document"
    );

    Ok(document)
}

/// Expands a leading `~` to the home directory.
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] if the path starts with `~` and
/// the home directory cannot be determined.
pub fn expand_path(path: &str) -> Result<PathBuf, ConfigError> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(ConfigError::no_home_directory)?;
        Ok(home.join(rest))
    } else if path == "~" {
        dirs::home_dir().ok_or_else(ConfigError::no_home_directory)
    } else {
        Ok(PathBuf::from(path))
    }
}

/// Returns the default base directory (`~/.chanfee`).
///
/// # Errors
///
/// Returns [`ConfigError::NoHomeDirectory`] if the home directory cannot be determined.
pub fn default_base_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or_else(ConfigError::no_home_directory)?;
    Ok(home.join(BASE_DIR_NAME))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

    use super::*;
    use crate::config::ConfigurationSource;
    use tempfile::TempDir;

    #[test]
    fn test_config_path_uses_base_dir() {
        let loader = ConfigLoader::with_base_dir(PathBuf::from("/srv/chanfee"));
        assert_eq!(
            loader.config_path(),
            PathBuf::from("/srv/chanfee/policies.toml")
        );
        assert_eq!(loader.base_dir(), Path::new("/srv/chanfee"));
    }

    #[test]
    fn test_load_missing_file_gives_empty_document() {
        let temp = TempDir::new().unwrap();
        let loader = ConfigLoader::with_base_dir(temp.path().to_path_buf());
        assert!(!loader.exists());
        assert!(loader.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_required_missing_file() {
        let temp = TempDir::new().unwrap();
        let loader = ConfigLoader::with_base_dir(temp.path().to_path_buf());
        let err = loader.load_required().unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_existing_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("policies.toml"),
            "[drained]\nchan.max_ratio = 0.1\n",
        )
        .unwrap();

        let loader = ConfigLoader::with_base_dir(temp.path().to_path_buf());
        assert!(loader.exists());
        let sections = loader.load().unwrap().sections().unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name(), "drained");
    }

    #[test]
    fn test_parse_error_mentions_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.toml");
        fs::write(&path, "[unterminated").unwrap();

        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailed { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(
            expand_path("/etc/chanfee/policies.toml").unwrap(),
            PathBuf::from("/etc/chanfee/policies.toml")
        );
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~").unwrap(), home);
            assert_eq!(expand_path("~/x.toml").unwrap(), home.join("x.toml"));
        }
    }
}
