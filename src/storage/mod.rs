//! Local JSON persistence
//!
//! Both persisted documents (the employee cache and the notification state)
//! are small JSON files written atomically: serialize to a `.tmp` sibling,
//! then rename over the target, so readers never see a partial write.

pub mod cache;
pub mod state;

use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use cache::CacheStore;
pub use state::StateStore;

/// Cache file name inside the data directory
pub const CACHE_FILE_NAME: &str = "employees_cache.json";

/// Notification state file name inside the data directory
pub const STATE_FILE_NAME: &str = "state.json";

/// Errors while reading or writing persisted JSON
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError {
    let path = path.to_path_buf();
    move |source| StorageError::Io { path, source }
}

/// One JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Read and decode the document; `Ok(None)` when the file does not exist
    pub async fn load<T: DeserializeOwned>(&self) -> StorageResult<Option<T>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let value = serde_json::from_slice(&bytes).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), "JSON document loaded");
        Ok(Some(value))
    }

    /// Load, substituting the default for a missing or unreadable file
    ///
    /// Unreadable files are logged and otherwise ignored.
    pub async fn load_or_default<T: DeserializeOwned + Default>(&self) -> T {
        match self.load().await {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable persisted document");
                T::default()
            }
        }
    }

    /// Serialize and atomically replace the document
    pub async fn save<T: Serialize>(&self, value: &T) -> StorageResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_error(parent))?;
        }

        let bytes = serde_json::to_vec_pretty(value).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, bytes)
            .await
            .map_err(io_error(&temp_path))?;

        // Atomic rename
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(io_error(&self.path))?;

        tracing::debug!(path = %self.path.display(), "JSON document saved");
        Ok(())
    }
}
