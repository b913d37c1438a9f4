use thiserror::Error;

/// Errors that can occur when reading or writing session storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing medium rejected the operation.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The key cannot be used by this storage backend.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// A filesystem error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
