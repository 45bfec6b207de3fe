//! Search index error types.

use thiserror::Error;

/// Errors that can occur during search index operations.
#[derive(Debug, Clone, Error)]
pub enum SearchIndexError {
    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Index creation failed for a reason other than "already exists".
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// A bulk request failed as a whole (transport or request-level error).
    /// Per-document failures are reported through the bulk summary instead.
    #[error("Bulk write error: {0}")]
    BulkWriteError(String),

    /// The engine's response could not be decoded.
    #[error("Response decode error: {0}")]
    DecodeError(String),
}

impl SearchIndexError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create an index creation error.
    pub fn index_creation(msg: impl Into<String>) -> Self {
        Self::IndexCreationError(msg.into())
    }

    /// Create a bulk write error.
    pub fn bulk_write(msg: impl Into<String>) -> Self {
        Self::BulkWriteError(msg.into())
    }

    /// Create a decode error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::DecodeError(msg.into())
    }
}
