//! # Archive Provider Error Types

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors surfaced by catalog search and asset resolution.
///
/// Resolution exhaustion is kept distinct from transport failures so callers
/// can show "no file available" rather than "connection failed".
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Transport-level failure on a search or manifest fetch.
    #[error("Network error: {0}")]
    Network(String),

    /// The response decoded as a unit could not be understood, even by the
    /// tolerant decoder.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Streamable resolution exhausted every fallback tier.
    #[error("No streamable file found for item '{0}'")]
    NoPlayableFile(String),

    /// Downloadable resolution exhausted every fallback tier.
    #[error("No downloadable file found for item '{0}'")]
    NoDownloadableFile(String),
}

impl From<BridgeError> for ArchiveError {
    fn from(err: BridgeError) -> Self {
        ArchiveError::Network(err.to_string())
    }
}

impl ArchiveError {
    /// Returns `true` when the failure means "nothing usable in the
    /// manifest" as opposed to a transport or decode problem.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ArchiveError::NoPlayableFile(_) | ArchiveError::NoDownloadableFile(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
