//! Snapshot store trait definition.
//!
//! The persistence/transport backend proper is external; this trait is the
//! seam the CLI drivers talk through, with a local file implementation for
//! development and single-machine use.

use async_trait::async_trait;

use crate::error::Result;

use super::deployment::UntypedDeployment;

/// Trait for deployment snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Loads the named stack's deployment envelope.
    ///
    /// Returns `None` if the stack has no snapshot yet.
    async fn load(&self, stack: &str) -> Result<Option<UntypedDeployment>>;

    /// Saves the named stack's deployment envelope.
    async fn save(&self, stack: &str, deployment: &UntypedDeployment) -> Result<()>;

    /// Deletes the named stack's snapshot.
    async fn delete(&self, stack: &str) -> Result<()>;

    /// Checks whether the named stack has a snapshot.
    async fn exists(&self, stack: &str) -> Result<bool>;

    /// Gets the backend type name.
    fn backend_type(&self) -> &'static str;
}
