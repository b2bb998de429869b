//! Error types for ProEdit.

use thiserror::Error;

/// Main error type for ProEdit operations.
#[derive(Error, Debug)]
pub enum ProEditError {
    #[error("Fetch error for '{source_id}': {reason}")]
    Fetch { source_id: String, reason: String },

    #[error("Decoder error: {0}")]
    Decoder(String),

    #[error("Fetch timed out for '{0}'")]
    Timeout(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Audio error: {0}")]
    Audio(String),
}

/// Result type alias for ProEdit operations.
pub type Result<T> = std::result::Result<T, ProEditError>;
