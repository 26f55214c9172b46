use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The key-value collaborator failed.
    #[error("Classification store error: {0}")]
    Store(#[from] BridgeError),

    /// A record could not be serialized for persistence.
    #[error("Classification record serialization failed: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
