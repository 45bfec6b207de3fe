//! # Wikidata Indexer
//!
//! Main library for the Wikidata search indexer.
//!
//! This crate provides the entry point and configuration for running the
//! retrieval-normalize-index pipeline against either a local entity dump or
//! a SPARQL query.

pub mod config;

pub use config::{Dependencies, RuntimeConfig, Source};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Client error.
    #[error("Client error: {0}")]
    ClientError(#[from] wikidata_indexer_client::ClientError),

    /// Search index error.
    #[error("Search index error: {0}")]
    SearchError(#[from] wikidata_indexer_repository::SearchIndexError),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] wikidata_indexer_pipeline::PipelineError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
