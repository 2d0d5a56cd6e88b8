//! Error types for the Vellum orchestration core.
//!
//! Errors fall into two disjoint classes:
//!
//! - [`InvariantViolation`]: internal-contract failures (double-set identity,
//!   hydrating an unresolved value, snapshotting without a URN). These are
//!   programming bugs; the current operation must stop rather than continue
//!   with inconsistent state, and they are never presented as ordinary user
//!   errors.
//! - Domain errors ([`DeploymentError`], [`ConfigError`], [`SnapshotError`]):
//!   recoverable conditions reported with actionable messages. Multi-resource
//!   validation collects every violation before failing so a single
//!   corrective rerun can address all of them.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the Vellum orchestration core.
#[derive(Debug, Error)]
pub enum VellumError {
    /// An internal contract was broken. Not a user error.
    #[error("Invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),

    /// Deployment import/export errors.
    #[error("Deployment error: {0}")]
    Deployment(#[from] DeploymentError),

    /// Stack configuration errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot storage errors.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A broken internal contract.
///
/// Each variant names the specific contract so callers and tests can match on
/// it. None of these are recoverable at the point of detection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A URN was assigned to a resource that already has one.
    #[error("URN already set on resource '{urn}'")]
    UrnAlreadySet {
        /// The URN that is already assigned.
        urn: String,
    },

    /// An ID was assigned over an existing concrete ID.
    #[error("unexpected double set on ID; previous='{previous}'")]
    IdAlreadySet {
        /// The concrete ID that is already assigned.
        previous: String,
    },

    /// A resource's ID was read before one was assigned.
    ///
    /// Callers must check `has_id` first.
    #[error("ID read before assignment on resource '{urn}'")]
    IdNotSet {
        /// URN of the resource, if one was assigned.
        urn: String,
    },

    /// A computed or output value reached hydration.
    ///
    /// Hydration only occurs on resolved data; unresolved placeholders must
    /// never be written onto a live object.
    #[error("cannot hydrate unresolved value for property '{key}'")]
    HydrateUnresolved {
        /// The property being hydrated.
        key: String,
    },

    /// A state snapshot was requested for a resource with no URN.
    #[error("resource must have a URN before a state snapshot can be taken")]
    MissingUrn,
}

/// Deployment import/export errors.
#[derive(Debug, Error)]
pub enum DeploymentError {
    /// The deployment payload uses a schema version this tool no longer reads.
    #[error("deployment schema version {found} is too old (minimum supported: {minimum})")]
    SchemaVersionTooOld {
        /// Version found in the envelope.
        found: i64,
        /// Oldest version this tool reads.
        minimum: i64,
    },

    /// The deployment payload uses a schema version newer than this tool.
    #[error("deployment schema version {found} is too new (current: {current}); please update vellum")]
    SchemaVersionTooNew {
        /// Version found in the envelope.
        found: i64,
        /// Newest version this tool writes.
        current: i64,
    },

    /// The payload could not be decoded at all.
    #[error("could not deserialize deployment: {message}")]
    Malformed {
        /// Description of the decode failure.
        message: String,
    },

    /// Resources in the payload belong to a different stack.
    ///
    /// Every offending resource is listed; nothing fails fast on the first.
    #[error("{}\nimporting this file could be dangerous; rerun with --force to proceed anyway", violations.join("\n"))]
    ForeignResources {
        /// Stack the import targets.
        stack: String,
        /// One message per mismatched resource.
        violations: Vec<String>,
    },
}

/// Stack configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested key does not exist.
    #[error("configuration key '{key}' not found for stack '{stack}'")]
    KeyNotFound {
        /// The missing key.
        key: String,
        /// Stack whose configuration was read.
        stack: String,
    },

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file {}: {message}", path.display())]
    ParseError {
        /// Path to the unreadable file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },
}

/// Snapshot storage errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// No snapshot exists for the named stack.
    #[error("no deployment snapshot found for stack '{stack}'")]
    NotFound {
        /// The stack with no snapshot.
        stack: String,
    },

    /// The stored snapshot could not be read back.
    #[error("snapshot is corrupted: {message}")]
    Corrupted {
        /// Description of the corruption.
        message: String,
    },

    /// Snapshot (de)serialization failed.
    #[error("snapshot serialization error: {message}")]
    SerializationError {
        /// Description of the serialization error.
        message: String,
    },
}

/// Result type alias for Vellum operations.
pub type Result<T> = std::result::Result<T, VellumError>;

impl VellumError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error is an internal-contract failure rather
    /// than a reportable user error.
    #[must_use]
    pub const fn is_invariant(&self) -> bool {
        matches!(self, Self::Invariant(_))
    }
}

impl SnapshotError {
    /// Creates a corruption error with the given message.
    #[must_use]
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted {
            message: message.into(),
        }
    }

    /// Creates a serialization error with the given message.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }
}
