//! Runtime configuration, built once from the environment and passed by
//! reference into every component that needs it.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::IndexingError;
use wikidata_indexer_shared::{parse_property_list, PropertyId};

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default target index name.
const DEFAULT_INDEX: &str = "wikidata";

/// Default language code.
const DEFAULT_LANGUAGE: &str = "en";

/// Default property set.
const DEFAULT_PROPERTIES: &str = "P31";

/// Default SPARQL page size.
const DEFAULT_PAGE_SIZE: usize = 100;

/// Default per-request timeout for the entity API, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 6;

/// Which source the run reads records from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Line-delimited JSON dump file.
    Dump(PathBuf),
    /// File containing a SPARQL SELECT query.
    Query(PathBuf),
}

impl Source {
    /// Build a source from the operator-supplied kind and path.
    pub fn from_parts(kind: &str, path: &str) -> Result<Self, IndexingError> {
        match kind {
            "dump" => Ok(Self::Dump(PathBuf::from(path))),
            "query" => Ok(Self::Query(PathBuf::from(path))),
            other => Err(IndexingError::config(format!(
                "WD_SOURCE must be 'dump' or 'query', got '{}'",
                other
            ))),
        }
    }
}

/// Operator-facing configuration consumed by the pipeline components.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Record source for this run.
    pub source: Source,
    /// OpenSearch server URL.
    pub opensearch_url: String,
    /// Target index name.
    pub index: String,
    /// Wikimedia language code.
    pub lang: String,
    /// Properties to project into documents.
    pub properties: Vec<PropertyId>,
    /// SPARQL page size.
    pub page_size: usize,
    /// Ids per entity-API request.
    pub entity_page_limit: usize,
    /// Per-request timeout for the entity API.
    pub timeout: Duration,
    /// Use the redirect target id for records carrying redirect info.
    pub use_redirected_ids: bool,
    /// Optional cap on entities/documents loaded.
    pub limit: Option<usize>,
    /// Optional override of the SPARQL endpoint.
    pub sparql_endpoint: Option<String>,
    /// Operator contact folded into the outbound user-agent.
    pub contact: Option<String>,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `WD_SOURCE`: `dump` or `query` (required)
    /// - `WD_INPUT_PATH`: dump file or query file path (required)
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `WD_INDEX`: target index name (default: wikidata)
    /// - `WD_LANGUAGE`: Wikimedia language code (default: en)
    /// - `WD_PROPERTIES`: comma-joined property ids, case-insensitive (default: P31)
    /// - `WD_PAGE_SIZE`: SPARQL page size (default: 100)
    /// - `WD_ENTITY_PAGE_LIMIT`: ids per entity-API request (default: 50)
    /// - `WD_TIMEOUT_SECS`: entity-API request timeout (default: 6)
    /// - `WD_USE_REDIRECTED_IDS`: key redirected records by their target id (default: false)
    /// - `WD_LIMIT`: optional cap on entities/documents loaded
    /// - `WD_SPARQL_ENDPOINT`: optional SPARQL endpoint override
    /// - `WIKIMEDIA_AGENT_CONTACT`: optional contact string for the user-agent
    pub fn from_env() -> Result<Self, IndexingError> {
        let source_kind = env::var("WD_SOURCE")
            .map_err(|_| IndexingError::config("WD_SOURCE must be set to 'dump' or 'query'"))?;
        let input_path = env::var("WD_INPUT_PATH")
            .map_err(|_| IndexingError::config("WD_INPUT_PATH must be set"))?;
        let source = Source::from_parts(&source_kind, &input_path)?;

        let opensearch_url =
            env::var("OPENSEARCH_URL").unwrap_or_else(|_| DEFAULT_OPENSEARCH_URL.to_string());
        let index = env::var("WD_INDEX").unwrap_or_else(|_| DEFAULT_INDEX.to_string());
        let lang = env::var("WD_LANGUAGE").unwrap_or_else(|_| DEFAULT_LANGUAGE.to_string());

        let properties = parse_property_list(
            &env::var("WD_PROPERTIES").unwrap_or_else(|_| DEFAULT_PROPERTIES.to_string()),
        );

        let page_size = require_nonzero(
            "WD_PAGE_SIZE",
            parse_var("WD_PAGE_SIZE")?.unwrap_or(DEFAULT_PAGE_SIZE),
        )?;
        let entity_page_limit = require_nonzero(
            "WD_ENTITY_PAGE_LIMIT",
            parse_var("WD_ENTITY_PAGE_LIMIT")?.unwrap_or(50),
        )?;
        let timeout_secs = parse_var("WD_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);
        let use_redirected_ids = parse_var("WD_USE_REDIRECTED_IDS")?.unwrap_or(false);
        let limit = parse_var("WD_LIMIT")?;

        let sparql_endpoint = env::var("WD_SPARQL_ENDPOINT").ok();
        let contact = env::var("WIKIMEDIA_AGENT_CONTACT").ok();

        info!(
            source = ?source,
            index = %index,
            lang = %lang,
            properties = properties.len(),
            "Loaded runtime configuration"
        );

        Ok(Self {
            source,
            opensearch_url,
            index,
            lang,
            properties,
            page_size,
            entity_page_limit,
            timeout: Duration::from_secs(timeout_secs),
            use_redirected_ids,
            limit,
            sparql_endpoint,
            contact,
        })
    }
}

/// Reject zero page sizes before any request goes out. A zero SPARQL page
/// never satisfies the short-page termination check, and a zero entity page
/// would make no progress.
fn require_nonzero(name: &str, value: usize) -> Result<usize, IndexingError> {
    if value == 0 {
        Err(IndexingError::config(format!(
            "{} must be greater than zero",
            name
        )))
    } else {
        Ok(value)
    }
}

/// Parse an optional typed environment variable.
fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, IndexingError> {
    match env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| IndexingError::config(format!("{} has an invalid value: {}", name, value))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_parts() {
        assert_eq!(
            Source::from_parts("dump", "/data/dump.ndjson").unwrap(),
            Source::Dump(PathBuf::from("/data/dump.ndjson"))
        );
        assert_eq!(
            Source::from_parts("query", "/data/humans.rq").unwrap(),
            Source::Query(PathBuf::from("/data/humans.rq"))
        );
    }

    #[test]
    fn test_unknown_source_kind_is_rejected() {
        let result = Source::from_parts("sparql", "/data/humans.rq");
        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
    }

    #[test]
    fn test_zero_page_sizes_are_rejected() {
        assert!(matches!(
            require_nonzero("WD_PAGE_SIZE", 0),
            Err(IndexingError::ConfigError(_))
        ));
        assert!(matches!(
            require_nonzero("WD_ENTITY_PAGE_LIMIT", 0),
            Err(IndexingError::ConfigError(_))
        ));
        assert_eq!(require_nonzero("WD_PAGE_SIZE", 100).unwrap(), 100);
    }
}
