//! # Playback Error Types

use bridge_traits::BridgeError;
use provider_archive::ArchiveError;
use thiserror::Error;

/// Errors surfaced by the playback arbiter.
///
/// Any of these leaves the arbiter in `Failed` with no live engine handle; a
/// subsequent `start` is always accepted.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// Asset resolution found nothing streamable for the item.
    #[error("No playable source for item '{0}'")]
    SourceNotFound(String),

    /// Asset resolution failed for transport or decode reasons.
    #[error("Audio source unavailable: {0}")]
    SourceUnavailable(String),

    /// The engine reported failure while starting or controlling playback.
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

impl From<ArchiveError> for PlaybackError {
    fn from(err: ArchiveError) -> Self {
        if err.is_not_found() {
            // The archive error message already names the item.
            PlaybackError::SourceNotFound(err.to_string())
        } else {
            PlaybackError::SourceUnavailable(err.to_string())
        }
    }
}

impl From<BridgeError> for PlaybackError {
    fn from(err: BridgeError) -> Self {
        PlaybackError::PlaybackFailed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlaybackError>;
