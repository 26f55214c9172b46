//! Filesystem-backed persistence adapters
//!
//! `FsBlobStore` materializes downloaded assets under a root directory.
//! `FileKeyValueStore` keeps one file per key, with the key percent-encoded
//! into the file name so arbitrary key strings stay path-safe.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    store::{BlobStore, KeyValueStore},
};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Blob store rooted in a single directory
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn target_path(&self, name: &str) -> PathBuf {
        // Strip any path components a remote file name might smuggle in.
        let safe_name = Path::new(name)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "blob".into());
        self.root.join(safe_name)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn write(&self, name: &str, data: Bytes) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.root).await?;

        let path = self.target_path(name);
        tokio::fs::write(&path, &data).await?;
        debug!(path = %path.display(), bytes = data.len(), "Wrote blob");

        Ok(path)
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        Ok(tokio::fs::try_exists(path).await?)
    }
}

/// Key-value store keeping one file per key
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(urlencoding::encode(key).into_owned())
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.key_path(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BridgeError::Io(e)),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.key_path(key), value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.key_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BridgeError::Io(e)),
        }
    }
}
