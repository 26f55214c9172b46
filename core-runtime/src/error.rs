use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// A required collaborator bridge was not provided at configuration time.
    #[error("Missing capability '{capability}': {message}")]
    CapabilityMissing {
        capability: String,
        message: String,
    },

    /// A configuration value failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Logging was initialized more than once or the filter failed to parse.
    #[error("Logging setup failed: {0}")]
    LoggingSetup(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
