//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::IndicesCreateParts,
    BulkParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config;
use crate::types::{BulkSummary, FailedAction};
use wikidata_indexer_shared::BulkAction;

/// OpenSearch-backed search index client.
pub struct OpenSearchIndexClient {
    client: OpenSearch,
}

impl OpenSearchIndexClient {
    /// Create a new client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    pub fn new(url: &str) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch client");

        Ok(Self { client })
    }

    /// Walk the per-item acks of a bulk response into a summary.
    ///
    /// Each item is inspected independently: an item with an `error` object
    /// or a non-2xx status is recorded as a failure with its response body,
    /// and never affects the accounting of its neighbors.
    fn summarize_bulk_response(body: &Value) -> Result<BulkSummary, SearchIndexError> {
        let items = body
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| SearchIndexError::decode("bulk response has no items array"))?;

        let mut summary = BulkSummary::default();

        for item in items {
            let ack = item.get("index").unwrap_or(item);
            let status = ack.get("status").and_then(Value::as_u64).unwrap_or(0);

            if ack.get("error").is_some() || status >= 300 {
                let id = ack
                    .get("_id")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                summary.failed.push(FailedAction {
                    id,
                    body: ack.clone(),
                });
            } else {
                summary.successes += 1;
            }
        }

        Ok(summary)
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchIndexClient {
    /// Create the index if absent. An "already exists" rejection from the
    /// engine is treated as success, so repeated runs against the same index
    /// never fail here.
    async fn ensure_index(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(index_config::index_settings())
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if status.is_success() {
            info!(index = %index, "Created index");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if body.contains("resource_already_exists_exception") {
            debug!(index = %index, "Index already exists");
            return Ok(());
        }

        error!(index = %index, status = %status, body = %body, "Index creation failed");
        Err(SearchIndexError::index_creation(format!(
            "status {}: {}",
            status, body
        )))
    }

    /// Submit actions through the `_bulk` API and account for each ack.
    async fn bulk_write(
        &self,
        index: &str,
        actions: Vec<BulkAction>,
    ) -> Result<BulkSummary, SearchIndexError> {
        if actions.is_empty() {
            return Ok(BulkSummary::default());
        }

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(actions.len() * 2);
        for action in &actions {
            body.push(json!({"index": {"_index": index, "_id": action.id}}).into());
            body.push(action.body.clone().into());
        }

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk_write(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Bulk request failed");
            return Err(SearchIndexError::bulk_write(format!(
                "status {}: {}",
                status, body
            )));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::decode(e.to_string()))?;

        let summary = Self::summarize_bulk_response(&response_body)?;
        debug!(
            successes = summary.successes,
            failed = summary.failed.len(),
            "Bulk batch acknowledged"
        );
        Ok(summary)
    }
}
