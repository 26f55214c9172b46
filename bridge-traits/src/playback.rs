//! Playback bridge traits and supporting audio types.
//!
//! These abstractions let the playback arbiter drive a platform audio engine
//! without knowing anything about it. A host provides an [`AudioEngine`]
//! factory; every call to [`AudioEngine::load`] produces a fresh
//! [`EngineHandle`] whose lifetime is the playback session. Dropping or
//! stopping a handle releases the underlying output resource, which is what
//! lets the arbiter enforce its at-most-one-live-handle invariant.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;

/// High-level audio source descriptor handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// Local file already materialized by the blob store.
    LocalFile { path: PathBuf },
    /// Remote HTTP(S) stream fetched by the engine.
    RemoteStream { url: String },
}

impl AudioSource {
    /// Determine whether the source represents remote content.
    pub fn is_remote(&self) -> bool {
        matches!(self, AudioSource::RemoteStream { .. })
    }
}

/// Display metadata surfaced to platform media sessions.
#[derive(Debug, Clone, Default)]
pub struct EngineMetadata {
    /// Display title for the track.
    pub title: Option<String>,
    /// Display artist or creator string.
    pub artist: Option<String>,
    /// Arbitrary extra fields (e.g. artwork URI).
    pub extra: HashMap<String, String>,
}

/// A live audio output session.
///
/// At most one handle produced by a given [`AudioEngine`] should be live at a
/// time; enforcing that is the arbiter's job, not the engine's.
#[async_trait]
pub trait EngineHandle: Send + Sync {
    /// Begin playback from the start of the source.
    async fn play(&self) -> Result<()>;

    /// Pause without releasing the output resource.
    async fn pause(&self) -> Result<()>;

    /// Resume after a pause.
    async fn resume(&self) -> Result<()>;

    /// Stop and release the output resource. After this call the handle is
    /// dead; further control calls may fail.
    async fn stop(&self) -> Result<()>;
}

/// Factory for engine handles.
#[async_trait]
pub trait AudioEngine: Send + Sync {
    /// Prepare a new engine handle for the given source. Implementations may
    /// allocate native resources and pre-buffer; they must not start audible
    /// output until [`EngineHandle::play`] is called.
    async fn load(
        &self,
        source: AudioSource,
        metadata: EngineMetadata,
    ) -> Result<Box<dyn EngineHandle>>;
}
