//! # Core Configuration Module
//!
//! Provides configuration management for the archive media core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! [`CoreConfig`] holding collaborator bridges and tunable settings. It
//! enforces fail-fast validation so a missing capability surfaces at
//! composition time with an actionable message, not deep inside a search or
//! playback call.
//!
//! ## Required Dependencies
//!
//! - `HttpClient` - catalog search, metadata fetches
//! - `KeyValueStore` - classification record persistence
//!
//! ## Optional Dependencies
//!
//! - `BlobStore` - only needed when the host materializes downloads
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .http_client(Arc::new(bridge_desktop::ReqwestHttpClient::new()))
//!     .key_value_store(Arc::new(bridge_desktop::FileKeyValueStore::new("/data/kv")))
//!     .build()?;
//! ```

use crate::error::{CoreError, Result};
use bridge_traits::{BlobStore, HttpClient, KeyValueStore};
use std::sync::Arc;
use std::time::Duration;

/// Default archive endpoint.
pub const DEFAULT_BASE_URL: &str = "https://archive.org";

/// Default search page size. The "has more pages" heuristic compares returned
/// item counts against this value, so changing it changes pagination behavior.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Tunable settings for the archive provider.
#[derive(Debug, Clone)]
pub struct ArchiveSettings {
    /// Base URL of the archive (search, metadata, and download endpoints
    /// are derived from it).
    pub base_url: String,

    /// Number of results requested per search page.
    pub page_size: usize,

    /// Timeout applied to individual search and metadata requests.
    pub request_timeout: Duration,

    /// Bounded timeout for local file existence probes before playback.
    pub local_probe_timeout: Duration,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(30),
            local_probe_timeout: Duration::from_secs(2),
        }
    }
}

/// Core configuration for the archive media core.
///
/// Use [`CoreConfig::builder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Archive provider settings.
    pub archive: ArchiveSettings,

    /// HTTP client for catalog and metadata requests (required).
    pub http_client: Arc<dyn HttpClient>,

    /// Opaque persistence for classification records (required).
    pub key_value_store: Arc<dyn KeyValueStore>,

    /// Local blob storage for downloaded assets (optional).
    pub blob_store: Option<Arc<dyn BlobStore>>,
}

impl CoreConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }
}

/// Builder for [`CoreConfig`] with fail-fast validation.
#[derive(Default)]
pub struct CoreConfigBuilder {
    archive: Option<ArchiveSettings>,
    http_client: Option<Arc<dyn HttpClient>>,
    key_value_store: Option<Arc<dyn KeyValueStore>>,
    blob_store: Option<Arc<dyn BlobStore>>,
}

impl CoreConfigBuilder {
    /// Override archive settings (defaults are used otherwise).
    pub fn archive(mut self, settings: ArchiveSettings) -> Self {
        self.archive = Some(settings);
        self
    }

    /// Provide the HTTP client bridge.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Provide the key-value store bridge.
    pub fn key_value_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.key_value_store = Some(store);
        self
    }

    /// Provide the blob store bridge.
    pub fn blob_store(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.blob_store = Some(store);
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<CoreConfig> {
        let archive = self.archive.unwrap_or_default();

        if archive.base_url.is_empty() {
            return Err(CoreError::InvalidConfig(
                "archive base_url must not be empty".to_string(),
            ));
        }
        if archive.page_size == 0 {
            return Err(CoreError::InvalidConfig(
                "archive page_size must be at least 1".to_string(),
            ));
        }

        let http_client = self.http_client.ok_or_else(|| CoreError::CapabilityMissing {
            capability: "HttpClient".to_string(),
            message: "No HTTP client implementation provided. \
                      Desktop hosts: inject bridge_desktop::ReqwestHttpClient. \
                      Other hosts: inject a platform-native adapter."
                .to_string(),
        })?;

        let key_value_store =
            self.key_value_store
                .ok_or_else(|| CoreError::CapabilityMissing {
                    capability: "KeyValueStore".to_string(),
                    message: "No key-value store provided; classification records \
                              cannot be persisted without one."
                        .to_string(),
                })?;

        Ok(CoreConfig {
            archive,
            http_client,
            key_value_store,
            blob_store: self.blob_store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::http::{HttpRequest, HttpResponse};

    struct NoopHttp;

    #[async_trait]
    impl HttpClient for NoopHttp {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            unimplemented!()
        }

        async fn download_stream(
            &self,
            _url: String,
        ) -> BridgeResult<Box<dyn tokio::io::AsyncRead + Send + Unpin>> {
            unimplemented!()
        }
    }

    struct NoopKv;

    #[async_trait]
    impl KeyValueStore for NoopKv {
        async fn get(&self, _key: &str) -> BridgeResult<Option<Vec<u8>>> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: &[u8]) -> BridgeResult<()> {
            Ok(())
        }

        async fn delete(&self, _key: &str) -> BridgeResult<()> {
            Ok(())
        }
    }

    #[test]
    fn build_fails_without_http_client() {
        let result = CoreConfig::builder()
            .key_value_store(Arc::new(NoopKv))
            .build();

        match result {
            Err(CoreError::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "HttpClient");
            }
            _ => panic!("expected CapabilityMissing"),
        }
    }

    #[test]
    fn build_fails_without_key_value_store() {
        let result = CoreConfig::builder().http_client(Arc::new(NoopHttp)).build();

        match result {
            Err(CoreError::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "KeyValueStore");
            }
            _ => panic!("expected CapabilityMissing"),
        }
    }

    #[test]
    fn build_applies_default_settings() {
        let config = CoreConfig::builder()
            .http_client(Arc::new(NoopHttp))
            .key_value_store(Arc::new(NoopKv))
            .build()
            .unwrap();

        assert_eq!(config.archive.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.archive.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.blob_store.is_none());
    }

    #[test]
    fn build_rejects_zero_page_size() {
        let result = CoreConfig::builder()
            .archive(ArchiveSettings {
                page_size: 0,
                ..ArchiveSettings::default()
            })
            .http_client(Arc::new(NoopHttp))
            .key_value_store(Arc::new(NoopKv))
            .build();

        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
    }
}
