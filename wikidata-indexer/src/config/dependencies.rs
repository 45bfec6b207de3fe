//! Dependency initialization and wiring for the indexer.

use std::sync::Arc;

use tracing::info;

use crate::config::{RuntimeConfig, Source};
use crate::IndexingError;
use wikidata_indexer_client::{
    EntityFetcher, EntityFetcherConfig, SparqlClient, SparqlClientConfig,
};
use wikidata_indexer_pipeline::{BulkLoader, ClaimProjector, IndexingPipeline, LoaderConfig};
use wikidata_indexer_repository::{BulkSummary, OpenSearchIndexClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    pipeline: IndexingPipeline,
    sparql: SparqlClient,
    fetcher: EntityFetcher,
}

impl Dependencies {
    /// Initialize all dependencies from the runtime configuration.
    pub fn new(config: &RuntimeConfig) -> Result<Self, IndexingError> {
        let search_client = OpenSearchIndexClient::new(&config.opensearch_url)?;

        let mut loader_config = LoaderConfig::default();
        if matches!(config.source, Source::Dump(_)) {
            // The query path is capped upstream via the SPARQL limit.
            loader_config.doc_limit = config.limit;
        }
        let loader = BulkLoader::with_config(Arc::new(search_client), loader_config);

        let projector = ClaimProjector::new(config.lang.clone(), config.properties.clone())
            .with_redirected_ids(config.use_redirected_ids);
        let pipeline = IndexingPipeline::new(projector, loader, config.index.clone());

        let mut sparql_config = SparqlClientConfig {
            contact: config.contact.clone(),
            ..Default::default()
        };
        if let Some(endpoint) = &config.sparql_endpoint {
            sparql_config.endpoint = endpoint.clone();
        }
        let sparql = SparqlClient::new(sparql_config)?;

        let fetcher = EntityFetcher::new(EntityFetcherConfig {
            page_limit: config.entity_page_limit,
            timeout: config.timeout,
            contact: config.contact.clone(),
            ..Default::default()
        })?;

        info!(
            opensearch_url = %config.opensearch_url,
            index = %config.index,
            "Initialized dependencies"
        );

        Ok(Self {
            pipeline,
            sparql,
            fetcher,
        })
    }

    /// Run the configured pipeline to completion.
    pub async fn run(&self, config: &RuntimeConfig) -> Result<BulkSummary, IndexingError> {
        let summary = match &config.source {
            Source::Dump(path) => self.pipeline.run_from_dump(path).await?,
            Source::Query(path) => {
                let query = tokio::fs::read_to_string(path).await?;
                self.pipeline
                    .run_from_query(
                        &self.sparql,
                        &self.fetcher,
                        &query,
                        config.page_size,
                        config.limit,
                    )
                    .await?
            }
        };
        Ok(summary)
    }
}
