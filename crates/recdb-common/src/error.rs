//! Error types for RecDB.

use thiserror::Error;

/// Result type alias using RecDbError.
pub type Result<T> = std::result::Result<T, RecDbError>;

/// Errors that can occur in RecDB operations.
#[derive(Debug, Error)]
pub enum RecDbError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Index errors
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Index corrupted: {0}")]
    IndexCorrupted(String),

    // Store errors
    #[error("Invalid position: {position} (store length {len})")]
    InvalidPosition { position: usize, len: usize },

    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter: {name} = {value}")]
    InvalidParameter { name: String, value: String },
}
