//! Batch entity retrieval through the `wbgetentities` API.
//!
//! Identifiers are split into request pages of `page_limit` ids and fetched
//! one GET per page. Pages are yielded as they arrive so downstream indexing
//! can begin before the whole identifier set is fetched. Unlike the SPARQL
//! side there is no retry here: entity fetches are many small independent
//! requests, and a timeout or HTTP error propagates straight to the caller.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use tracing::debug;

use crate::errors::ClientError;
use crate::user_agent::build_user_agent;
use wikidata_indexer_shared::RawEntity;

/// Default Wikidata action API endpoint.
pub const DEFAULT_ENTITY_ENDPOINT: &str = "https://www.wikidata.org/w/api.php";

/// Property groups requested for every entity.
const ENTITY_PROPS: &str = "labels|aliases|claims|descriptions";

/// Default ids per request. The API ceiling is around 500 for most callers.
const DEFAULT_PAGE_LIMIT: usize = 50;

/// Configuration for the entity fetcher.
#[derive(Debug, Clone)]
pub struct EntityFetcherConfig {
    /// Action API endpoint URL.
    pub endpoint: String,
    /// Number of ids per request page.
    pub page_limit: usize,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Operator contact folded into the user-agent header.
    pub contact: Option<String>,
}

impl Default for EntityFetcherConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENTITY_ENDPOINT.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            timeout: Duration::from_secs(6),
            contact: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EntityResponse {
    entities: HashMap<String, RawEntity>,
}

/// Client for the `wbgetentities` entity API.
pub struct EntityFetcher {
    http: reqwest::Client,
    config: EntityFetcherConfig,
}

impl EntityFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: EntityFetcherConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(build_user_agent(config.contact.as_deref()))
            .build()?;

        Ok(Self { http, config })
    }

    /// Fetch raw entity records, one stream element per request page.
    ///
    /// Pages preserve the input id order. Each page is requested only when
    /// the consumer polls for it, so a slow consumer applies backpressure to
    /// the API rather than buffering the whole result set.
    pub fn fetch<'a>(
        &'a self,
        ids: &[String],
        lang: &'a str,
    ) -> impl Stream<Item = Result<Vec<RawEntity>, ClientError>> + 'a {
        let pages = chunk_ids(ids, self.config.page_limit);
        debug!(
            ids = ids.len(),
            pages = pages.len(),
            page_limit = self.config.page_limit,
            "Fetching entity records"
        );

        stream::iter(pages).then(move |page| async move { self.fetch_page(&page, lang).await })
    }

    /// Fetch and collect all records. Convenience over [`EntityFetcher::fetch`]
    /// for callers that do not need streaming.
    pub async fn fetch_all(
        &self,
        ids: &[String],
        lang: &str,
    ) -> Result<Vec<RawEntity>, ClientError> {
        let mut all = Vec::with_capacity(ids.len());
        let pages = self.fetch(ids, lang);
        futures::pin_mut!(pages);
        while let Some(page) = pages.next().await {
            all.extend(page?);
        }
        Ok(all)
    }

    /// Map entity ids to their label in the target language.
    ///
    /// Input ids are de-duplicated first. Entities without a label in `lang`
    /// map to the empty string.
    pub async fn labels(
        &self,
        ids: &[String],
        lang: &str,
    ) -> Result<HashMap<String, String>, ClientError> {
        let mut seen = HashSet::new();
        let unique: Vec<String> = ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();

        let mut mapping = HashMap::with_capacity(unique.len());
        for entity in self.fetch_all(&unique, lang).await? {
            let label = entity
                .labels
                .get(lang)
                .map(|label| label.value.clone())
                .unwrap_or_default();
            mapping.insert(entity.id, label);
        }
        Ok(mapping)
    }

    async fn fetch_page(&self, ids: &[String], lang: &str) -> Result<Vec<RawEntity>, ClientError> {
        let joined = ids.join("|");

        let response = self
            .http
            .get(&self.config.endpoint)
            .query(&[
                ("action", "wbgetentities"),
                ("format", "json"),
                ("ids", joined.as_str()),
                ("props", ENTITY_PROPS),
                ("languages", lang),
                ("languagefallback", "1"),
                ("formatversion", "2"),
            ])
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::entity_api_failed(status.as_u16(), body));
        }

        let body: EntityResponse = response.json().await?;

        // Re-emit in requested-id order; the response map carries no order.
        // Records keyed under another id (e.g. a resolved redirect target)
        // are appended after the matched ones rather than dropped.
        let mut entities = body.entities;
        let mut page: Vec<RawEntity> = ids
            .iter()
            .filter_map(|id| entities.remove(id))
            .collect();
        page.extend(entities.into_values());
        Ok(page)
    }
}

/// Split ids into contiguous request pages of at most `page_limit` entries,
/// preserving input order.
fn chunk_ids(ids: &[String], page_limit: usize) -> Vec<Vec<String>> {
    ids.chunks(page_limit.max(1))
        .map(<[String]>::to_vec)
        .collect()
}
