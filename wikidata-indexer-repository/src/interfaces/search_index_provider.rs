//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch,
//! etc.) and mock implementations in tests.

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::BulkSummary;
use wikidata_indexer_shared::BulkAction;

/// Abstracts the underlying search index implementation.
///
/// Implementations are injected into the pipeline's bulk loader to enable
/// dependency injection and easy testing with mock backends.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Create the index if it does not exist.
    ///
    /// Must be idempotent: an "already exists" response from the engine is
    /// success, not an error.
    ///
    /// # Arguments
    ///
    /// * `index` - Name of the index to create
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index exists after the call
    /// * `Err(SearchIndexError)` - If creation fails for any other reason
    async fn ensure_index(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Submit a batch of `{id, body}` actions and account for each ack
    /// independently.
    ///
    /// # Arguments
    ///
    /// * `index` - Target index name
    /// * `actions` - Bulk actions to submit
    ///
    /// # Returns
    ///
    /// * `Ok(BulkSummary)` - Per-action success/failure accounting
    /// * `Err(SearchIndexError)` - If the bulk request fails as a whole
    async fn bulk_write(
        &self,
        index: &str,
        actions: Vec<BulkAction>,
    ) -> Result<BulkSummary, SearchIndexError>;
}
