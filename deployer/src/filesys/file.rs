//! File operations

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;

use crate::errors::DeployError;

/// A file wrapper with path
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
}

impl File {
    /// Create a new file reference
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the file exists
    pub async fn exists(&self) -> bool {
        fs::metadata(&self.path).await.is_ok()
    }

    /// Read file contents as string
    pub async fn read_string(&self) -> Result<String, DeployError> {
        fs::read_to_string(&self.path).await.map_err(|e| {
            DeployError::ConfigError(format!("unable to read {}: {}", self.path.display(), e))
        })
    }

    /// Read file as JSON
    pub async fn read_json<T: DeserializeOwned>(&self) -> Result<T, DeployError> {
        let contents = self.read_string().await?;
        serde_json::from_str(&contents).map_err(|e| {
            DeployError::ConfigError(format!("invalid JSON in {}: {}", self.path.display(), e))
        })
    }

    /// Write JSON to file, pretty printed
    pub async fn write_json<T: Serialize>(&self, value: &T) -> Result<(), DeployError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let contents = serde_json::to_string_pretty(value)?;
        fs::write(&self.path, contents).await?;
        Ok(())
    }
}
