//! Versioned deployment snapshots.
//!
//! A deployment travels as an [`UntypedDeployment`] envelope: a schema
//! version plus a raw JSON payload. The payload is kept raw on the wire so
//! fields written by newer tools survive a round trip through this one; it is
//! decoded into a typed [`Deployment`] only when the contents must actually
//! be inspected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{DeploymentError, Result, SnapshotError};
use crate::resource::{State, Urn};

/// The deployment schema version this tool writes.
pub const DEPLOYMENT_SCHEMA_VERSION_CURRENT: i64 = 1;

/// The oldest deployment schema version this tool still reads.
pub const DEPLOYMENT_SCHEMA_VERSION_OLDEST: i64 = 1;

/// The versioned envelope a deployment travels in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UntypedDeployment {
    /// Deployment schema version.
    pub version: i64,
    /// The raw deployment payload, preserved verbatim for round-tripping.
    pub deployment: serde_json::Value,
}

/// Provenance metadata recorded alongside a deployment's resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// When the deployment snapshot was produced.
    pub time: DateTime<Utc>,
    /// Digest of the serialized resources, for integrity checks.
    pub magic: String,
}

/// A typed deployment: per-resource states plus any operations that were
/// still in flight when the snapshot was taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    /// Provenance metadata.
    pub manifest: Manifest,
    /// Every resource's state, in dependency order.
    pub resources: Vec<State>,
    /// Operations that had not completed when the snapshot was taken.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending_operations: Vec<PendingOperation>,
}

/// An operation that was in flight when a snapshot was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOperation {
    /// URN of the resource the operation was acting on.
    pub urn: Urn,
    /// What the operation was doing.
    pub kind: OperationKind,
}

/// The kind of an in-flight operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// The resource was being created.
    Creating,
    /// The resource was being updated.
    Updating,
    /// The resource was being deleted.
    Deleting,
    /// The resource was being read from the provider.
    Reading,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Creating => "creating",
            Self::Updating => "updating",
            Self::Deleting => "deleting",
            Self::Reading => "reading",
        };
        write!(f, "{kind}")
    }
}

impl Deployment {
    /// Creates a deployment from resource states, stamping a fresh manifest.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the resources cannot be encoded for
    /// digesting.
    pub fn new(resources: Vec<State>) -> Result<Self> {
        let magic = resources_digest(&resources)?;
        Ok(Self {
            manifest: Manifest {
                time: Utc::now(),
                magic,
            },
            resources,
            pending_operations: Vec::new(),
        })
    }

    /// Returns true if the manifest digest still matches the resources.
    ///
    /// A mismatch means the snapshot was hand-edited or corrupted after it
    /// was produced; callers typically warn rather than fail, since
    /// hand-editing an exported deployment is a supported workflow.
    #[must_use]
    pub fn verify_magic(&self) -> bool {
        resources_digest(&self.resources)
            .map(|digest| digest == self.manifest.magic)
            .unwrap_or(false)
    }
}

/// Computes the sha256 digest of the canonically serialized resources.
fn resources_digest(resources: &[State]) -> Result<String> {
    let bytes = serde_json::to_vec(resources)
        .map_err(|e| SnapshotError::serialization(e.to_string()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

/// Wraps a typed deployment into the current versioned envelope.
///
/// # Errors
///
/// Returns a serialization error if the deployment cannot be encoded.
pub fn serialize_deployment(deployment: &Deployment) -> Result<UntypedDeployment> {
    let payload = serde_json::to_value(deployment)
        .map_err(|e| SnapshotError::serialization(e.to_string()))?;
    Ok(UntypedDeployment {
        version: DEPLOYMENT_SCHEMA_VERSION_CURRENT,
        deployment: payload,
    })
}

/// Decodes an envelope into a typed deployment, enforcing the supported
/// schema version window.
///
/// # Errors
///
/// Returns [`DeploymentError::SchemaVersionTooOld`] or
/// [`DeploymentError::SchemaVersionTooNew`] for versions outside the window,
/// and [`DeploymentError::Malformed`] if the payload does not decode.
pub fn deserialize_untyped(untyped: &UntypedDeployment) -> Result<Deployment> {
    if untyped.version < DEPLOYMENT_SCHEMA_VERSION_OLDEST {
        return Err(DeploymentError::SchemaVersionTooOld {
            found: untyped.version,
            minimum: DEPLOYMENT_SCHEMA_VERSION_OLDEST,
        }
        .into());
    }
    if untyped.version > DEPLOYMENT_SCHEMA_VERSION_CURRENT {
        return Err(DeploymentError::SchemaVersionTooNew {
            found: untyped.version,
            current: DEPLOYMENT_SCHEMA_VERSION_CURRENT,
        }
        .into());
    }

    let deployment: Deployment = serde_json::from_value(untyped.deployment.clone())
        .map_err(|e| DeploymentError::Malformed {
            message: e.to_string(),
        })?;
    Ok(deployment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VellumError;
    use crate::resource::{PropertyKey, PropertyMap, PropertyValue, ResourceId, TypeToken};

    fn sample_state(name: &str) -> State {
        State::new(
            TypeToken::from("cloud:vm:Instance"),
            Urn::from(format!("urn:vellum:dev::proj::cloud:vm:Instance::{name}")),
            ResourceId::from(format!("i-{name}")),
            PropertyMap::from([(PropertyKey::from("size"), PropertyValue::Number(1.0))]),
            PropertyMap::new(),
        )
    }

    #[test]
    fn test_envelope_round_trip() {
        let deployment = Deployment::new(vec![sample_state("web")]).expect("deployment");
        let untyped = serialize_deployment(&deployment).expect("serialize");
        assert_eq!(untyped.version, DEPLOYMENT_SCHEMA_VERSION_CURRENT);

        let back = deserialize_untyped(&untyped).expect("deserialize");
        assert_eq!(back.resources, deployment.resources);
        assert_eq!(back.manifest, deployment.manifest);
    }

    #[test]
    fn test_schema_version_too_old() {
        let untyped = UntypedDeployment {
            version: DEPLOYMENT_SCHEMA_VERSION_OLDEST - 1,
            deployment: serde_json::Value::Null,
        };
        let err = deserialize_untyped(&untyped).expect_err("too old");
        assert!(matches!(
            err,
            VellumError::Deployment(DeploymentError::SchemaVersionTooOld { .. })
        ));
    }

    #[test]
    fn test_schema_version_too_new() {
        let untyped = UntypedDeployment {
            version: DEPLOYMENT_SCHEMA_VERSION_CURRENT + 1,
            deployment: serde_json::Value::Null,
        };
        let err = deserialize_untyped(&untyped).expect_err("too new");
        assert!(matches!(
            err,
            VellumError::Deployment(DeploymentError::SchemaVersionTooNew { .. })
        ));
    }

    #[test]
    fn test_malformed_payload() {
        let untyped = UntypedDeployment {
            version: DEPLOYMENT_SCHEMA_VERSION_CURRENT,
            deployment: serde_json::json!({"not": "a deployment"}),
        };
        let err = deserialize_untyped(&untyped).expect_err("malformed");
        assert!(matches!(
            err,
            VellumError::Deployment(DeploymentError::Malformed { .. })
        ));
    }

    #[test]
    fn test_manifest_digest_detects_edits() {
        let mut deployment =
            Deployment::new(vec![sample_state("web"), sample_state("db")]).expect("deployment");
        assert!(deployment.verify_magic());

        deployment.resources.pop();
        assert!(!deployment.verify_magic());
    }

    #[test]
    fn test_manifest_digest_is_deterministic() {
        let a = Deployment::new(vec![sample_state("web")]).expect("deployment a");
        let b = Deployment::new(vec![sample_state("web")]).expect("deployment b");
        assert_eq!(a.manifest.magic, b.manifest.magic);
    }
}
