//! File-backed store
//!
//! One file per key under a storage directory, written with async IO. This is
//! the on-device durable store for hosts without a platform storage layer.

use crate::error::{CartError, CartResult};
use crate::store::CartStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Durable store that keeps each key as a JSON file on disk
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at the given directory
    ///
    /// The directory is created lazily on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default per-user storage directory
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("trolley")
    }

    /// Root directory of this store
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        // Keys are namespaced with ':'; keep file names portable
        self.dir.join(format!("{}.json", key.replace([':', '/'], "_")))
    }
}

#[async_trait]
impl CartStore for FileStore {
    async fn get(&self, key: &str) -> CartResult<Option<Vec<u8>>> {
        let path = self.key_path(key);

        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)
            .await
            .map_err(|e| CartError::storage_read(format!("reading {}", path.display()), e))?;
        Ok(Some(bytes))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> CartResult<()> {
        let path = self.key_path(key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                CartError::storage_write(format!("creating {}", parent.display()), e)
            })?;
        }

        fs::write(&path, value)
            .await
            .map_err(|e| CartError::storage_write(format!("writing {}", path.display()), e))?;

        Ok(())
    }
}
