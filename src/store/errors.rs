//! Store error types

use std::io;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a [`DocumentStore`](super::DocumentStore).
///
/// Every variant is a server-side failure from the caller's point of view.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store cannot be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A document with the same id already exists
    #[error("Duplicate key {id} in collection '{collection}'")]
    DuplicateKey { collection: String, id: i64 },

    /// A document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Another process holds the data file
    #[error("Data file {path} is locked by another process (remove {lock} if no server is running)")]
    Locked { path: String, lock: String },

    /// Snapshot file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Anything else the backend reports
    #[error("Internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn duplicate_key(collection: impl Into<String>, id: i64) -> Self {
        Self::DuplicateKey {
            collection: collection.into(),
            id,
        }
    }
}
