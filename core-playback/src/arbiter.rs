//! Playback Arbiter
//!
//! State machine owning at most one live engine handle. Every mutating
//! operation runs under one async mutex, so "stop old, then start new" can
//! never interleave with a concurrent `start`. That ordering is what keeps
//! two engine handles from being live at once.
//!
//! All UI surfaces observe the same projection through a watch channel, so
//! they can never disagree about what is currently playing.

use bridge_traits::playback::{AudioEngine, AudioSource, EngineHandle, EngineMetadata};
use bridge_traits::store::BlobStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::traits::{PlaybackItem, StreamLocator};

/// Playback lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArbiterState {
    Idle,
    Starting,
    Playing,
    Paused,
    Failed,
}

/// Observable projection shared by every UI surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub state: ArbiterState,
    pub is_playing: bool,
    pub current_title: Option<String>,
    pub current_identifier: Option<String>,
    /// Derived purely from queue/index bounds; `false` at the tail.
    pub has_next: bool,
    /// Derived purely from queue/index bounds; `false` at the head.
    pub has_previous: bool,
    /// Message of the most recent failure, cleared by the next start.
    pub last_error: Option<String>,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            state: ArbiterState::Idle,
            is_playing: false,
            current_title: None,
            current_identifier: None,
            has_next: false,
            has_previous: false,
            last_error: None,
        }
    }
}

struct SessionInner {
    handle: Option<Box<dyn EngineHandle>>,
    state: ArbiterState,
    item: Option<PlaybackItem>,
    queue: Vec<PlaybackItem>,
    index: usize,
    last_error: Option<String>,
}

impl SessionInner {
    fn new() -> Self {
        Self {
            handle: None,
            state: ArbiterState::Idle,
            item: None,
            queue: Vec::new(),
            index: 0,
            last_error: None,
        }
    }

    fn has_next(&self) -> bool {
        !self.queue.is_empty() && self.index + 1 < self.queue.len()
    }

    fn has_previous(&self) -> bool {
        !self.queue.is_empty() && self.index > 0
    }
}

/// Arbiter for the single shared audio output.
///
/// Constructed once by the composition root and passed by handle to every
/// consumer. The exactly-one-live-session invariant is a property of this
/// object, not of the process.
pub struct PlaybackArbiter {
    engine: Arc<dyn AudioEngine>,
    locator: Arc<dyn StreamLocator>,
    blob_store: Option<Arc<dyn BlobStore>>,
    local_probe_timeout: Duration,
    inner: Mutex<SessionInner>,
    projection: watch::Sender<PlaybackSnapshot>,
}

impl PlaybackArbiter {
    pub fn new(
        engine: Arc<dyn AudioEngine>,
        locator: Arc<dyn StreamLocator>,
        blob_store: Option<Arc<dyn BlobStore>>,
        local_probe_timeout: Duration,
    ) -> Self {
        let (projection, _) = watch::channel(PlaybackSnapshot::default());
        Self {
            engine,
            locator,
            blob_store,
            local_probe_timeout,
            inner: Mutex::new(SessionInner::new()),
            projection,
        }
    }

    /// Current projection.
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.projection.borrow().clone()
    }

    /// Subscribe to projection updates.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.projection.subscribe()
    }

    /// Start playing `item`, replacing whatever session exists.
    ///
    /// A non-empty `sibling_queue` becomes the navigation queue, with the
    /// index at the position of `item` within it; an empty one clears any
    /// previous queue. The old engine handle is stopped before the new one
    /// is created.
    pub async fn start(&self, item: PlaybackItem, sibling_queue: Vec<PlaybackItem>) -> Result<()> {
        let mut inner = self.inner.lock().await;

        if sibling_queue.is_empty() {
            inner.queue.clear();
            inner.index = 0;
        } else {
            inner.index = sibling_queue
                .iter()
                .position(|q| q.catalog.identifier == item.catalog.identifier)
                .unwrap_or(0);
            inner.queue = sibling_queue;
        }

        self.start_locked(&mut inner, item).await
    }

    /// Advance to the next queue item. No-op without a queue or at the tail.
    pub async fn next(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if !inner.has_next() {
            debug!("next() at queue tail, ignoring");
            return Ok(());
        }
        inner.index += 1;
        let item = inner.queue[inner.index].clone();
        self.start_locked(&mut inner, item).await
    }

    /// Retreat to the previous queue item. No-op without a queue or at the
    /// head.
    pub async fn previous(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if !inner.has_previous() {
            debug!("previous() at queue head, ignoring");
            return Ok(());
        }
        inner.index -= 1;
        let item = inner.queue[inner.index].clone();
        self.start_locked(&mut inner, item).await
    }

    /// Pause playback. Touches neither the engine handle nor the queue.
    pub async fn pause(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.state != ArbiterState::Playing {
            return Ok(());
        }
        if let Some(handle) = &inner.handle {
            handle.pause().await?;
        }
        inner.state = ArbiterState::Paused;
        self.publish(&inner);
        Ok(())
    }

    /// Resume after a pause.
    pub async fn resume(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.state != ArbiterState::Paused {
            return Ok(());
        }
        if let Some(handle) = &inner.handle {
            handle.resume().await?;
        }
        inner.state = ArbiterState::Playing;
        self.publish(&inner);
        Ok(())
    }

    /// Release the engine handle and return to `Idle`.
    pub async fn stop(&self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        Self::choke(&mut inner).await;
        *inner = SessionInner::new();
        self.publish(&inner);
        info!("Playback stopped");
        Ok(())
    }

    /// Stop and release the current handle, if any. Must complete before a
    /// new handle is created.
    async fn choke(inner: &mut SessionInner) {
        if let Some(old) = inner.handle.take() {
            if let Err(e) = old.stop().await {
                // The handle is dropped regardless; a failed stop must not
                // block the next session.
                warn!(error = %e, "Engine handle refused to stop");
            }
        }
    }

    async fn start_locked(&self, inner: &mut SessionInner, item: PlaybackItem) -> Result<()> {
        Self::choke(inner).await;

        inner.state = ArbiterState::Starting;
        inner.last_error = None;
        inner.item = Some(item.clone());
        self.publish(inner);

        let title = item.catalog.title.clone();
        info!(identifier = %item.catalog.identifier, title = %title, "Starting playback");

        let outcome = self.bring_up(&item).await;
        match outcome {
            Ok(handle) => {
                inner.handle = Some(handle);
                inner.state = ArbiterState::Playing;
                self.publish(inner);
                Ok(())
            }
            Err(e) => {
                // No handle survives a failure; the next start is always
                // accepted.
                inner.handle = None;
                inner.state = ArbiterState::Failed;
                inner.last_error = Some(e.to_string());
                self.publish(inner);
                warn!(identifier = %item.catalog.identifier, error = %e, "Playback start failed");
                Err(e)
            }
        }
    }

    /// Resolve the source and bring a fresh engine handle to `Playing`.
    async fn bring_up(&self, item: &PlaybackItem) -> Result<Box<dyn EngineHandle>> {
        let source = self.resolve_source(item).await?;

        let metadata = EngineMetadata {
            title: Some(item.catalog.title.clone()),
            artist: item.catalog.creator.clone(),
            ..EngineMetadata::default()
        };

        let handle = self.engine.load(source, metadata).await?;
        if let Err(e) = handle.play().await {
            // Release the half-started handle before reporting failure.
            let _ = handle.stop().await;
            return Err(e.into());
        }
        Ok(handle)
    }

    async fn resolve_source(&self, item: &PlaybackItem) -> Result<AudioSource> {
        if let Some(path) = &item.local_path {
            match &self.blob_store {
                Some(store) => {
                    // Bounded probe so a hung filesystem cannot stall the
                    // arbiter; a failed probe falls back to remote resolution.
                    let probe =
                        tokio::time::timeout(self.local_probe_timeout, store.exists(path)).await;
                    match probe {
                        Ok(Ok(true)) => {
                            return Ok(AudioSource::LocalFile { path: path.clone() })
                        }
                        Ok(Ok(false)) => {
                            debug!(path = %path.display(), "Local file gone, resolving remotely")
                        }
                        Ok(Err(e)) => {
                            warn!(path = %path.display(), error = %e, "Local probe failed")
                        }
                        Err(_) => {
                            warn!(path = %path.display(), "Local probe timed out")
                        }
                    }
                }
                None => return Ok(AudioSource::LocalFile { path: path.clone() }),
            }
        }

        self.locator.locate(&item.catalog).await
    }

    fn publish(&self, inner: &SessionInner) {
        let snapshot = PlaybackSnapshot {
            state: inner.state,
            is_playing: inner.state == ArbiterState::Playing,
            current_title: inner.item.as_ref().map(|i| i.catalog.title.clone()),
            current_identifier: inner
                .item
                .as_ref()
                .map(|i| i.catalog.identifier.clone()),
            has_next: inner.has_next(),
            has_previous: inner.has_previous(),
            last_error: inner.last_error.clone(),
        };
        // Receivers may come and go; publishing to none is fine.
        let _ = self.projection.send_replace(snapshot);
    }
}

impl std::fmt::Debug for PlaybackArbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackArbiter")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}
