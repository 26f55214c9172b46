//! Playback seams.
//!
//! The arbiter never talks to the archive directly; it asks a
//! [`StreamLocator`] for an [`AudioSource`]. In production that locator wraps
//! the archive asset resolver; tests substitute their own.

use async_trait::async_trait;
use bridge_traits::playback::AudioSource;
use provider_archive::{AssetResolver, CatalogItem};
use std::path::PathBuf;
use tracing::debug;

use crate::error::Result;

/// One playable unit handed to the arbiter.
///
/// Items the host has already downloaded carry a local path; everything else
/// is resolved remotely at start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackItem {
    pub catalog: CatalogItem,
    pub local_path: Option<PathBuf>,
}

impl PlaybackItem {
    /// An item that must be resolved against the archive.
    pub fn remote(catalog: CatalogItem) -> Self {
        Self {
            catalog,
            local_path: None,
        }
    }

    /// An item already materialized on local storage.
    pub fn local(catalog: CatalogItem, path: impl Into<PathBuf>) -> Self {
        Self {
            catalog,
            local_path: Some(path.into()),
        }
    }
}

/// Resolves a catalog item into a streamable audio source.
#[async_trait]
pub trait StreamLocator: Send + Sync {
    async fn locate(&self, item: &CatalogItem) -> Result<AudioSource>;
}

/// Production locator backed by the archive asset resolver.
pub struct ArchiveStreamLocator {
    resolver: AssetResolver,
}

impl ArchiveStreamLocator {
    pub fn new(resolver: AssetResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl StreamLocator for ArchiveStreamLocator {
    async fn locate(&self, item: &CatalogItem) -> Result<AudioSource> {
        let url = self.resolver.resolve_streamable(item).await?;
        debug!(identifier = %item.identifier, "Located remote stream");
        Ok(AudioSource::RemoteStream { url })
    }
}
