//! Error types for the Wikidata clients.

use thiserror::Error;

/// Errors that can occur while talking to the Wikidata endpoints.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The query text failed validation before any request was made.
    #[error("Invalid SPARQL query: {0}")]
    InvalidQuery(String),

    /// The query endpoint rejected the request for a reason other than
    /// throttling.
    #[error("Query endpoint returned status {status}: {body}")]
    QueryFailed { status: u16, body: String },

    /// The entity API returned a non-success status.
    #[error("Entity API returned status {status}: {body}")]
    EntityApiFailed { status: u16, body: String },

    /// Transport-level failure, including request timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured retry budget for throttled queries was exhausted.
    #[error("Query endpoint still throttling after {attempts} attempts")]
    Throttled { attempts: u32 },
}

impl ClientError {
    /// Create an invalid-query error.
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Create a query-failed error.
    pub fn query_failed(status: u16, body: impl Into<String>) -> Self {
        Self::QueryFailed {
            status,
            body: body.into(),
        }
    }

    /// Create an entity-API error.
    pub fn entity_api_failed(status: u16, body: impl Into<String>) -> Self {
        Self::EntityApiFailed {
            status,
            body: body.into(),
        }
    }
}
