//! Error types for the indexing pipeline.

use thiserror::Error;

use wikidata_indexer_client::ClientError;
use wikidata_indexer_repository::SearchIndexError;

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Wikidata client error (SPARQL endpoint or entity API).
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    /// Search index error.
    #[error("Search index error: {0}")]
    Search(#[from] SearchIndexError),

    /// IO error reading the dump file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A dump line failed to decode. This aborts the run.
    #[error("Malformed dump line {line}: {source}")]
    MalformedLine {
        line: usize,
        source: serde_json::Error,
    },

    /// A document failed to serialize into a bulk action body.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Create a malformed-line error.
    pub fn malformed_line(line: usize, source: serde_json::Error) -> Self {
        Self::MalformedLine { line, source }
    }
}
