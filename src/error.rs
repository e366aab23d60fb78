//! Perception Kit error types

use thiserror::Error;

/// Perception Kit error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Artifact loading error (bad status, unusable document)
    #[error("Load error: {0}")]
    Load(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parse error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Result type alias for Perception Kit operations
pub type Result<T> = std::result::Result<T, Error>;
