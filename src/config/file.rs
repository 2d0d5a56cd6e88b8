//! Per-stack configuration file persistence.
//!
//! Each stack's configuration lives in `vellum.<stack>.yaml` next to the
//! project. A missing file means an empty configuration; the file is only
//! created once a value is set.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ConfigError, Result};

use super::map::{ConfigMap, StackConfig};

/// On-disk shape of a stack configuration file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    /// Configuration entries.
    #[serde(default)]
    config: ConfigMap,
}

/// Path of the named stack's configuration file inside `dir`.
#[must_use]
pub fn config_file_path(dir: &Path, stack: &str) -> PathBuf {
    dir.join(format!("vellum.{stack}.yaml"))
}

/// Loads the named stack's configuration.
///
/// A missing file yields an empty configuration.
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] if the file exists but cannot be read
/// or parsed.
pub fn load_stack_config(dir: &Path, stack: &str) -> Result<StackConfig> {
    let path = config_file_path(dir, stack);
    if !path.exists() {
        debug!("No configuration file for stack '{stack}', starting empty");
        return Ok(StackConfig::new(stack));
    }

    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        message: e.to_string(),
    })?;

    let file: ConfigFile = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path,
        message: e.to_string(),
    })?;

    Ok(StackConfig::with_values(stack, file.config))
}

/// Saves a stack's configuration, creating the file if needed.
///
/// # Errors
///
/// Returns an IO error if the file cannot be written.
pub fn save_stack_config(dir: &Path, config: &StackConfig) -> Result<()> {
    let path = config_file_path(dir, config.stack());
    let file = ConfigFile {
        config: config.values().clone(),
    };

    let content = serde_yaml::to_string(&file).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        message: e.to_string(),
    })?;

    std::fs::write(&path, content)?;
    debug!("Saved configuration for stack '{}'", config.stack());
    Ok(())
}
