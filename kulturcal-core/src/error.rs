//! Error types for the kulturcal crates.

use thiserror::Error;

/// Errors that can occur in kulturcal operations.
#[derive(Error, Debug)]
pub enum KulturError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for kulturcal operations.
pub type KulturResult<T> = Result<T, KulturError>;
