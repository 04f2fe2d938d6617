//! Unified error types for trawl

use thiserror::Error;

/// Unified error type for all trawl operations
#[derive(Error, Debug)]
pub enum TrawlError {
    /// Browser launch, navigation or CDP failure
    #[error("browser error: {0}")]
    Browser(String),

    /// A bounded wait expired before its condition held
    #[error("timed out waiting for {0}")]
    Timeout(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias using TrawlError
pub type Result<T> = std::result::Result<T, TrawlError>;
