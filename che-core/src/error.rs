//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A command precondition does not hold (not initialized, not
    /// running, workspace missing). Rendered verbatim since the message
    /// catalog already phrases these for the user.
    #[error("{0}")]
    Precondition(String),

    #[error("Process failed: {0}")]
    Process(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote API error: {0}")]
    Api(String),

    #[error("{0}")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for CheError {
    fn from(err: serde_json::Error) -> Self {
        CheError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CheError>;
