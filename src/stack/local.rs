//! Local file-based snapshot storage backend.
//!
//! Stores one deployment file per stack under a `.vellum/` directory,
//! written atomically (temp file then rename) so a crash mid-save never
//! leaves a truncated snapshot behind.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{Result, SnapshotError, VellumError};

use super::deployment::UntypedDeployment;
use super::store::SnapshotStore;

/// Default snapshot directory name.
const SNAPSHOT_DIR: &str = ".vellum";

/// Suffix of per-stack deployment files.
const DEPLOYMENT_SUFFIX: &str = ".deployment.json";

/// Local file-based snapshot store.
#[derive(Debug)]
pub struct LocalSnapshotStore {
    /// Base directory for snapshot files.
    base_dir: PathBuf,
}

impl LocalSnapshotStore {
    /// Creates a local store rooted in the current directory's `.vellum/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn new() -> Result<Self> {
        let base_dir = std::env::current_dir()
            .map_err(|e| VellumError::internal(format!("Cannot determine current directory: {e}")))?
            .join(SNAPSHOT_DIR);
        Ok(Self::with_base_dir(base_dir))
    }

    /// Creates a local store with a custom base directory.
    #[must_use]
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Path of the named stack's deployment file.
    fn deployment_path(&self, stack: &str) -> PathBuf {
        self.base_dir.join(format!("{stack}{DEPLOYMENT_SUFFIX}"))
    }

    /// Ensures the snapshot directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if !self.base_dir.exists() {
            debug!("Creating snapshot directory: {}", self.base_dir.display());
            fs::create_dir_all(&self.base_dir).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl SnapshotStore for LocalSnapshotStore {
    async fn load(&self, stack: &str) -> Result<Option<UntypedDeployment>> {
        let path = self.deployment_path(stack);
        if !path.exists() {
            debug!("No snapshot file for stack '{stack}': {}", path.display());
            return Ok(None);
        }

        info!("Loading snapshot from: {}", path.display());

        let content = fs::read_to_string(&path).await.map_err(|e| {
            SnapshotError::corrupted(format!("failed to read snapshot file: {e}"))
        })?;

        let deployment: UntypedDeployment = serde_json::from_str(&content).map_err(|e| {
            SnapshotError::corrupted(format!("failed to parse snapshot file: {e}"))
        })?;

        Ok(Some(deployment))
    }

    async fn save(&self, stack: &str, deployment: &UntypedDeployment) -> Result<()> {
        self.ensure_dir().await?;

        let path = self.deployment_path(stack);
        info!("Saving snapshot to: {}", path.display());

        let content = serde_json::to_string_pretty(deployment)
            .map_err(|e| SnapshotError::serialization(e.to_string()))?;

        // Write to a temporary file first, then rename for atomicity.
        let temp_path = path.with_extension("tmp");

        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.sync_all().await?;

        fs::rename(&temp_path, &path).await?;

        debug!("Snapshot for stack '{stack}' saved");
        Ok(())
    }

    async fn delete(&self, stack: &str) -> Result<()> {
        let path = self.deployment_path(stack);
        if path.exists() {
            info!("Deleting snapshot file: {}", path.display());
            fs::remove_file(&path).await?;
        }
        Ok(())
    }

    async fn exists(&self, stack: &str) -> Result<bool> {
        Ok(self.deployment_path(stack).exists())
    }

    fn backend_type(&self) -> &'static str {
        "local"
    }
}
