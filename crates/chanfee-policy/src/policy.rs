//! Named policies.

use crate::namespace::{split_key, Namespace};
use chanfee_core::config::{Section, SettingValue, Settings};
use chanfee_core::error::ConfigError;

/// Name of the fallback policy section.
pub const DEFAULT_POLICY_NAME: &str = "default";

/// A named policy: match predicates plus the settings applied on a match.
///
/// Keys of the form `namespace.attribute` are predicates; all other keys are
/// carried through untouched for whatever applies the policy.
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    name: String,
    settings: Settings,
}

impl Policy {
    /// Creates a policy.
    #[must_use]
    pub fn new(name: impl Into<String>, settings: Settings) -> Self {
        Self {
            name: name.into(),
            settings,
        }
    }

    /// The implicit default used when a document has no `default` section.
    #[must_use]
    pub fn empty_default() -> Self {
        Self::new(DEFAULT_POLICY_NAME, Settings::new())
    }

    /// Policy name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All raw settings, predicates included.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns `true` for the `default` policy.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_POLICY_NAME
    }

    /// Predicate keys, in document order.
    pub fn predicate_keys(&self) -> impl Iterator<Item = &str> {
        self.settings.keys().filter(|key| split_key(key).is_some())
    }

    /// Non-predicate settings, in document order.
    pub fn action_settings(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.settings
            .iter()
            .filter(|(key, _)| split_key(key).is_none())
    }

    /// Distinct namespace prefixes used by this policy, in first-seen order.
    #[must_use]
    pub fn namespace_prefixes(&self) -> Vec<&str> {
        let mut prefixes: Vec<&str> = Vec::new();
        for (prefix, _) in self.settings.keys().filter_map(split_key) {
            if !prefixes.contains(&prefix) {
                prefixes.push(prefix);
            }
        }
        prefixes
    }

    /// Resolves and checks every predicate key.
    ///
    /// Returns the namespaces to evaluate, in first-seen order. No channel
    /// data is involved, so the outcome depends only on the policy itself.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownNamespace`], [`ConfigError::UnknownKey`]
    /// or [`ConfigError::InvalidValue`].
    pub fn validate(&self) -> Result<Vec<Namespace>, ConfigError> {
        let namespaces = self
            .namespace_prefixes()
            .into_iter()
            .map(|prefix| {
                Namespace::parse(prefix)
                    .ok_or_else(|| ConfigError::unknown_namespace(&self.name, prefix))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for namespace in &namespaces {
            namespace.validate(self)?;
        }

        Ok(namespaces)
    }
}

impl From<Section> for Policy {
    fn from(section: Section) -> Self {
        let (name, settings) = section.into_parts();
        Self::new(name, settings)
    }
}
