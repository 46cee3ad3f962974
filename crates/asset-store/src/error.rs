//! Error types for the asset-store crate

use thiserror::Error;

/// Result type alias using `StoreError`
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during object storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Container not found
    #[error("container not found: {0}")]
    ContainerNotFound(String),

    /// Object not found
    #[error("object not found: {container}/{key}")]
    NotFound { container: String, key: String },

    /// Object key rejected by the backend
    #[error("invalid object key: {0}")]
    InvalidKey(String),

    /// The data stream handed to `put_stream` failed while being read.
    /// Distinct from `Write` so callers can tell a source fault (the
    /// uploader) from a storage fault (the backend).
    #[error("error reading source stream: {0}")]
    Source(#[source] std::io::Error),

    /// Writing to the backend failed
    #[error("write failed for {container}/{key}: {source}")]
    Write {
        container: String,
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
