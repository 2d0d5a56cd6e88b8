//! Resource identity tokens.
//!
//! A URN is the globally unique, human-friendly name a resource keeps for its
//! whole lifetime. An ID is the provider-assigned identifier, known only once
//! the provider has actually created the resource.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every URN.
pub const URN_PREFIX: &str = "urn:vellum:";

/// Separator between URN components.
pub const URN_DELIMITER: &str = "::";

/// A uniform resource name: `urn:vellum:<stack>::<project>::<type>::<name>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Urn(String);

impl Urn {
    /// Builds a URN from its components.
    #[must_use]
    pub fn new(stack: &str, project: &str, type_token: &TypeToken, name: &str) -> Self {
        Self(format!(
            "{URN_PREFIX}{stack}{URN_DELIMITER}{project}{URN_DELIMITER}{type_token}{URN_DELIMITER}{name}"
        ))
    }

    /// Returns the full URN string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the stack name embedded in this URN.
    ///
    /// Returns an empty string if the URN does not carry the expected prefix;
    /// such URNs never match any stack, which is the safe outcome for
    /// ownership checks.
    #[must_use]
    pub fn stack(&self) -> &str {
        self.0
            .strip_prefix(URN_PREFIX)
            .and_then(|rest| rest.split(URN_DELIMITER).next())
            .unwrap_or("")
    }

    /// Returns the resource name component, the last URN segment.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rsplit(URN_DELIMITER).next().unwrap_or("")
    }
}

impl From<String> for Urn {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Urn {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A provider-assigned resource identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Returns the identifier string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resource type token, e.g. `aws:ec2/instance:Instance`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeToken(String);

impl TypeToken {
    /// Returns the token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TypeToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TypeToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
