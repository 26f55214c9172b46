//! Persistence Abstractions
//!
//! Two opaque collaborators: a key-value store for small records
//! (classification results, session bookkeeping) and a blob store that
//! materializes downloaded assets on local storage.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Opaque key-value persistence
///
/// The core never interprets the stored bytes; serialization is the caller's
/// concern. Keys are arbitrary UTF-8 strings.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Retrieve the value for a key
    ///
    /// Returns `Ok(None)` if the key does not exist.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store a value, replacing any previous one
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a key
    ///
    /// Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check whether a key exists without retrieving its value
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

/// Local blob storage for downloaded assets
///
/// The core only constructs source URLs; the actual transfer and write are
/// delegated to implementations of this trait.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write bytes under a suggested file name, returning the final path
    async fn write(&self, name: &str, data: Bytes) -> Result<PathBuf>;

    /// Check whether a previously written blob still exists
    async fn exists(&self, path: &Path) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    struct MemoryStore {
        values: Mutex<HashMap<String, Vec<u8>>>,
    }

    #[async_trait]
    impl KeyValueStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            Ok(self.values.lock().await.get(key).cloned())
        }

        async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
            self.values
                .lock()
                .await
                .insert(key.to_string(), value.to_vec());
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.values.lock().await.remove(key);
            Ok(())
        }
    }

    #[tokio::test]
    async fn default_contains_uses_get() {
        let store = MemoryStore {
            values: Mutex::new(HashMap::new()),
        };

        assert!(!store.contains("missing").await.unwrap());
        store.set("present", b"1").await.unwrap();
        assert!(store.contains("present").await.unwrap());
    }
}
