//! Error types for the invscan-core library.
//!
//! The parsers themselves never fail; these errors cover configuration and
//! the remote extraction path.

use thiserror::Error;

/// Main error type for the invscan library.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Remote AI extraction error.
    #[cfg(feature = "ai")]
    #[error("AI extraction error: {0}")]
    Ai(#[from] crate::ai::AiError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for the invscan library.
pub type Result<T> = std::result::Result<T, ScanError>;
