//! Policy documents and typed access to their settings.
//!
//! A policy document is an ordered list of named [`Section`]s. Each section
//! holds ordered [`Settings`]: dotted keys such as `chan.min_ratio` are match
//! predicates, keys without a dot (`strategy`, `fee_ppm`, ...) are settings
//! for whatever applies the policy afterwards.
//!
//! # Configuration File
//!
//! Documents are stored as TOML. Every top-level table is a section, in file
//! order. Dotted keys produce nested tables which are flattened back into
//! dotted keys:
//!
//! ```toml
//! [default]
//! strategy = "static"
//! fee_ppm = 10
//!
//! [drained]
//! chan.max_ratio = 0.2
//! node.min_channels = 10
//! strategy = "static"
//! fee_ppm = 1000
//! ```
//!
//! Lists may be written as TOML arrays or as comma-separated strings.
//!
//! A dotted table header splits too: `[fees.chan]` is section `fees` with
//! `chan.*` keys. A section whose name contains a dot must be quoted, as in
//! `["fees.v2"]`.
//!
//! # Examples
//!
//! ```
//! use chanfee_core::config::{ConfigurationSource, PolicyDocument};
//!
//! let doc = PolicyDocument::from_toml_str(r#"
//! [drained]
//! chan.max_ratio = 0.2
//! fee_ppm = 1000
//! "#).unwrap();
//!
//! let sections = doc.sections().unwrap();
//! assert_eq!(sections[0].name(), "drained");
//! assert_eq!(sections[0].settings().get_f64("chan.max_ratio").unwrap(), Some(0.2));
//! ```

use crate::error::ConfigError;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// A single setting value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Text.
    String(String),
    /// Signed integer.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Boolean.
    Boolean(bool),
    /// List of strings.
    List(Vec<String>),
}

impl SettingValue {
    /// Short name of the value's type, for error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::List(_) => "list",
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Vec<String>> for SettingValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for SettingValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(String::from).collect())
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Ordered key/value settings of one section.
///
/// Keys are unique; inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    entries: Vec<(String, SettingValue)>,
}

impl Settings {
    /// Creates empty settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts or replaces a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads a string value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the value is not a string.
    pub fn get_str(&self, key: &str) -> Result<Option<&str>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(SettingValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(type_mismatch(key, "a string", other)),
        }
    }

    /// Reads a list value.
    ///
    /// Accepts a list, a comma-separated string, or a single integer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for booleans and floats.
    pub fn get_list(&self, key: &str) -> Result<Option<Vec<String>>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(SettingValue::List(items)) => Ok(Some(items.clone())),
            Some(SettingValue::String(s)) => Ok(Some(
                s.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(String::from)
                    .collect(),
            )),
            Some(SettingValue::Integer(i)) => Ok(Some(vec![i.to_string()])),
            Some(other) => Err(type_mismatch(key, "a list", other)),
        }
    }

    /// Reads a non-negative integer value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the value is negative, not an
    /// integer, or a string that does not parse as one.
    pub fn get_u64(&self, key: &str) -> Result<Option<u64>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(SettingValue::Integer(i)) => u64::try_from(*i)
                .map(Some)
                .map_err(|_| ConfigError::invalid_value(key, format!("{i} is negative"))),
            Some(SettingValue::String(s)) => s.trim().parse().map(Some).map_err(|_| {
                ConfigError::invalid_value(key, format!("'{s}' is not a non-negative integer"))
            }),
            Some(other) => Err(type_mismatch(key, "an integer", other)),
        }
    }

    /// Reads a floating point value. Integers are widened.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the value is not numeric or is
    /// NaN.
    #[allow(clippy::cast_precision_loss)]
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, ConfigError> {
        let value = match self.get(key) {
            None => return Ok(None),
            Some(SettingValue::Float(x)) => *x,
            Some(SettingValue::Integer(i)) => *i as f64,
            Some(SettingValue::String(s)) => s.trim().parse().map_err(|_| {
                ConfigError::invalid_value(key, format!("'{s}' is not a number"))
            })?,
            Some(other) => return Err(type_mismatch(key, "a number", other)),
        };
        if value.is_nan() {
            return Err(ConfigError::invalid_value(key, "NaN is not allowed"));
        }
        Ok(Some(value))
    }

    /// Reads a boolean value.
    ///
    /// Strings `true/false`, `yes/no`, `on/off` and `1/0` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for anything else.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        match self.get(key) {
            None => Ok(None),
            Some(SettingValue::Boolean(b)) => Ok(Some(*b)),
            Some(SettingValue::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(Some(true)),
                "false" | "no" | "off" | "0" => Ok(Some(false)),
                _ => Err(ConfigError::invalid_value(
                    key,
                    format!("'{s}' is not a boolean"),
                )),
            },
            Some(other) => Err(type_mismatch(key, "a boolean", other)),
        }
    }
}

impl Serialize for Settings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn type_mismatch(key: &str, expected: &str, found: &SettingValue) -> ConfigError {
    ConfigError::invalid_value(
        key,
        format!("expected {expected}, found {}", found.type_name()),
    )
}

// ============================================================================
// Section / ConfigurationSource
// ============================================================================

/// A named section of a policy document.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    name: String,
    settings: Settings,
}

impl Section {
    /// Creates a section.
    #[must_use]
    pub fn new(name: impl Into<String>, settings: Settings) -> Self {
        Self {
            name: name.into(),
            settings,
        }
    }

    /// Section name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Section settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Splits into name and settings.
    #[must_use]
    pub fn into_parts(self) -> (String, Settings) {
        (self.name, self.settings)
    }
}

/// Anything that can provide ordered named sections.
///
/// The order of the returned sections is significant: it is the match
/// priority of the resulting policies.
pub trait ConfigurationSource {
    /// Returns all sections in document order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the sections cannot be produced.
    fn sections(&self) -> Result<Vec<Section>, ConfigError>;
}

impl ConfigurationSource for [Section] {
    fn sections(&self) -> Result<Vec<Section>, ConfigError> {
        Ok(self.to_vec())
    }
}

impl ConfigurationSource for Vec<Section> {
    fn sections(&self) -> Result<Vec<Section>, ConfigError> {
        Ok(self.clone())
    }
}

// ============================================================================
// PolicyDocument
// ============================================================================

/// A policy document parsed from TOML.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyDocument {
    sections: Vec<Section>,
}

impl PolicyDocument {
    /// Creates an empty document.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sections: Vec::new(),
        }
    }

    /// Appends a section.
    #[must_use]
    pub fn with_section(mut self, name: impl Into<String>, settings: Settings) -> Self {
        self.sections.push(Section::new(name, settings));
        self
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ParseFailed`] for invalid TOML or top-level
    /// values that are not tables, and [`ConfigError::InvalidValue`] for values
    /// that cannot be represented as a [`SettingValue`].
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = content
            .parse()
            .map_err(|e| ConfigError::parse_failed(format!("invalid TOML: {e}")))?;

        let mut sections = Vec::with_capacity(table.len());
        for (name, value) in table {
            let toml::Value::Table(inner) = value else {
                return Err(ConfigError::parse_failed(format!(
                    "top-level key '{name}' must be a section"
                )));
            };
            let mut settings = Settings::new();
            flatten_into(&mut settings, None, inner)?;
            sections.push(Section::new(name, settings));
        }

        Ok(Self { sections })
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` if the document has no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Returns the first section named `name`.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name() == name)
    }
}

impl ConfigurationSource for PolicyDocument {
    fn sections(&self) -> Result<Vec<Section>, ConfigError> {
        Ok(self.sections.clone())
    }
}

fn flatten_into(
    settings: &mut Settings,
    prefix: Option<&str>,
    table: toml::Table,
) -> Result<(), ConfigError> {
    for (key, value) in table {
        let full_key = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key,
        };
        match value {
            toml::Value::Table(inner) => flatten_into(settings, Some(&full_key), inner)?,
            other => {
                let converted = convert_value(&full_key, other)?;
                settings.insert(full_key, converted);
            }
        }
    }
    Ok(())
}

fn convert_value(key: &str, value: toml::Value) -> Result<SettingValue, ConfigError> {
    match value {
        toml::Value::String(s) => Ok(SettingValue::String(s)),
        toml::Value::Integer(i) => Ok(SettingValue::Integer(i)),
        toml::Value::Float(x) => Ok(SettingValue::Float(x)),
        toml::Value::Boolean(b) => Ok(SettingValue::Boolean(b)),
        toml::Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                toml::Value::String(s) => Ok(s),
                toml::Value::Integer(i) => Ok(i.to_string()),
                other => Err(ConfigError::invalid_value(
                    key,
                    format!("list items must be strings, found {}", other.type_str()),
                )),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(SettingValue::List),
        toml::Value::Datetime(dt) => Err(ConfigError::invalid_value(
            key,
            format!("datetime {dt} is not supported"),
        )),
        toml::Value::Table(_) => Err(ConfigError::invalid_value(key, "unexpected table")),
    }
}
