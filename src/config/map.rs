//! Per-stack configuration values.
//!
//! Configuration is a flat mapping from namespaced token keys (for example
//! `aws:region`) to string values. Keys live in a `BTreeMap`, so enumeration
//! is always in deterministic key order. The only verbs are read, set, and
//! delete: reading a missing key is a user-facing error, deleting a missing
//! key is a no-op so re-applying the same removal stays idempotent.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ConfigError, Result};

/// A namespaced configuration key, e.g. `aws:region`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigKey(String);

impl ConfigKey {
    /// Returns the full key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the namespace portion, if the key carries one.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.0.split_once(':').map(|(ns, _)| ns)
    }
}

impl Borrow<str> for ConfigKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for ConfigKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ConfigKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mapping from configuration keys to values. Values are string-only for
/// now.
pub type ConfigMap = BTreeMap<ConfigKey, String>;

/// A stack's configuration: the stack name plus its key/value entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackConfig {
    /// The stack this configuration belongs to.
    stack: String,
    /// Configuration entries in deterministic key order.
    values: ConfigMap,
}

impl StackConfig {
    /// Creates an empty configuration for the named stack.
    #[must_use]
    pub fn new(stack: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
            values: ConfigMap::new(),
        }
    }

    /// Creates a configuration from existing entries.
    #[must_use]
    pub fn with_values(stack: impl Into<String>, values: ConfigMap) -> Self {
        Self {
            stack: stack.into(),
            values,
        }
    }

    /// Returns the stack name.
    #[must_use]
    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// Reads a configuration value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KeyNotFound`] if the key does not exist.
    pub fn get(&self, key: &str) -> Result<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| {
                ConfigError::KeyNotFound {
                    key: key.to_string(),
                    stack: self.stack.clone(),
                }
                .into()
            })
    }

    /// Sets a configuration value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<ConfigKey>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Deletes a configuration value. Deleting a missing key is a no-op.
    ///
    /// Returns true if a value was actually removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    /// Returns all entries in deterministic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ConfigKey, &str)> {
        self.values.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Returns the underlying map.
    #[must_use]
    pub const fn values(&self) -> &ConfigMap {
        &self.values
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
