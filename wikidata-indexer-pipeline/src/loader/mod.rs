//! Bulk loader for the indexing pipeline.
//!
//! Consumes a stream of normalized documents and submits them to the search
//! index in batches. Batching plus a bounded number of in-flight bulk
//! requests give the pipeline backpressure: a fast producer (e.g. a local
//! dump read) can only get `queue_size` batches ahead of the index's write
//! throughput. Batches may be acknowledged out of submission order; the
//! index is keyed by document id, so final index state does not depend on
//! write order.

use std::sync::Arc;

use futures::stream::{Stream, StreamExt};
use tracing::{debug, info, instrument};

use crate::errors::PipelineError;
use wikidata_indexer_repository::{BulkSummary, SearchIndexProvider};
use wikidata_indexer_shared::{BulkAction, NormalizedDocument};

/// Configuration for the bulk loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of documents per bulk request.
    pub chunk_size: usize,
    /// Maximum number of bulk requests in flight at once.
    pub queue_size: usize,
    /// Optional cap on documents drawn from the stream. Used by the dump
    /// source path; the query path is capped upstream via the SPARQL limit.
    pub doc_limit: Option<usize>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            queue_size: 8,
            doc_limit: None,
        }
    }
}

/// Loader that bulk-writes documents into the search engine.
pub struct BulkLoader {
    provider: Arc<dyn SearchIndexProvider>,
    config: LoaderConfig,
}

impl BulkLoader {
    /// Create a new loader with default configuration.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: LoaderConfig::default(),
        }
    }

    /// Create a new loader with custom configuration.
    pub fn with_config(provider: Arc<dyn SearchIndexProvider>, config: LoaderConfig) -> Self {
        Self { provider, config }
    }

    /// Ensure the target index exists. Idempotent.
    pub async fn ensure_index(&self, index: &str) -> Result<(), PipelineError> {
        self.provider.ensure_index(index).await?;
        Ok(())
    }

    /// Drain a document stream into the index.
    ///
    /// Returns per-document accounting: a document the engine rejects is
    /// recorded in the summary and never aborts the batch or the run.
    /// Transport-level failures of a whole bulk request do abort.
    #[instrument(skip(self, documents), fields(index = %index))]
    pub async fn index<S>(&self, index: &str, documents: S) -> Result<BulkSummary, PipelineError>
    where
        S: Stream<Item = Result<NormalizedDocument, PipelineError>>,
    {
        let doc_limit = self.config.doc_limit.unwrap_or(usize::MAX);
        let index_name = index.to_string();
        let provider = Arc::clone(&self.provider);

        let batches = documents
            .take(doc_limit)
            .map(|document| {
                document.and_then(|doc| BulkAction::try_from(doc).map_err(PipelineError::from))
            })
            .chunks(self.config.chunk_size.max(1))
            .map(move |batch| {
                let provider = Arc::clone(&provider);
                let index_name = index_name.clone();
                async move {
                    let actions = batch.into_iter().collect::<Result<Vec<_>, _>>()?;
                    provider
                        .bulk_write(&index_name, actions)
                        .await
                        .map_err(PipelineError::from)
                }
            })
            .buffer_unordered(self.config.queue_size.max(1));
        futures::pin_mut!(batches);

        let mut summary = BulkSummary::default();
        while let Some(batch) = batches.next().await {
            let batch = batch?;
            debug!(
                batch_successes = batch.successes,
                batch_failed = batch.failed.len(),
                "Bulk batch acknowledged"
            );
            summary.merge(batch);
        }

        info!(
            successes = summary.successes,
            failed = summary.failed.len(),
            "Indexing complete"
        );
        Ok(summary)
    }
}
