//! Pipeline composition.
//!
//! Wires a record source (dump file, or SPARQL query plus entity fetches)
//! through the claim projector into the bulk loader. Both paths ensure the
//! target index exists before any document is written, and both report
//! per-document success/failure accounting for the run.

use std::path::Path;

use futures::stream::{self, StreamExt};
use tracing::{info, instrument};

use crate::errors::PipelineError;
use crate::loader::BulkLoader;
use crate::processor::ClaimProjector;
use crate::source;
use wikidata_indexer_client::{get_entities_from_query, EntityFetcher, SparqlQuery};
use wikidata_indexer_repository::BulkSummary;
use wikidata_indexer_shared::NormalizedDocument;

/// The retrieval-normalize-index pipeline.
pub struct IndexingPipeline {
    projector: ClaimProjector,
    loader: BulkLoader,
    index: String,
}

impl IndexingPipeline {
    /// Create a pipeline writing to the given index.
    pub fn new(projector: ClaimProjector, loader: BulkLoader, index: impl Into<String>) -> Self {
        Self {
            projector,
            loader,
            index: index.into(),
        }
    }

    /// Index every record of a line-delimited dump file.
    #[instrument(skip(self, path), fields(index = %self.index))]
    pub async fn run_from_dump(&self, path: impl AsRef<Path>) -> Result<BulkSummary, PipelineError> {
        self.loader.ensure_index(&self.index).await?;

        let records = source::open_dump(path).await?;
        let projector = self.projector.clone();
        let documents = records.map(move |record| record.map(|raw| projector.project(&raw)));

        self.loader.index(&self.index, documents).await
    }

    /// Run a paginated SPARQL query, fetch the matching entities and index
    /// them.
    ///
    /// Entity pages stream straight into the loader, so indexing begins
    /// before the full identifier set has been fetched. `limit` caps the
    /// number of ids collected from the query (to the nearest page).
    #[instrument(skip(self, sparql, fetcher, query), fields(index = %self.index))]
    pub async fn run_from_query<S: SparqlQuery>(
        &self,
        sparql: &S,
        fetcher: &EntityFetcher,
        query: &str,
        page_size: usize,
        limit: Option<usize>,
    ) -> Result<BulkSummary, PipelineError> {
        let ids = get_entities_from_query(sparql, query, page_size, limit).await?;
        info!(ids = ids.len(), "Retrieving entity records for query results");

        self.loader.ensure_index(&self.index).await?;

        let projector = self.projector.clone();
        let lang = projector.lang().to_string();
        let pages = fetcher.fetch(&ids, &lang);

        let documents = pages
            .map(move |page| match page {
                Ok(entities) => {
                    let projected: Vec<Result<NormalizedDocument, PipelineError>> = entities
                        .iter()
                        .map(|entity| Ok(projector.project(entity)))
                        .collect();
                    stream::iter(projected)
                }
                Err(e) => stream::iter(vec![Err(PipelineError::from(e))]),
            })
            .flatten();

        self.loader.index(&self.index, documents).await
    }
}
