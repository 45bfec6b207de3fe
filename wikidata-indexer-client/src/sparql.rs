//! SPARQL query execution and pagination.
//!
//! The query endpoint is the one collaborator whose failures are expected in
//! normal operation: bulk pagination regularly trips throttling. A throttled
//! request (HTTP 429) is retried in an explicit loop, honoring any
//! server-provided `Retry-After` delay, through an injected [`Sleeper`] so
//! tests never touch the wall clock. Every other error status is fatal to
//! the call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RETRY_AFTER};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::errors::ClientError;
use crate::user_agent::build_user_agent;
use wikidata_indexer_shared::{qid_from_uri, SparqlResults};

/// Default Wikidata query endpoint.
pub const DEFAULT_SPARQL_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// Fallback backoff when a 429 response carries no `Retry-After` header.
const DEFAULT_THROTTLE_BACKOFF: Duration = Duration::from_secs(10);

/// Abstraction over sleeping, injected so retry behavior is testable.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by `tokio::time::sleep`.
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Configuration for the SPARQL client.
#[derive(Debug, Clone)]
pub struct SparqlClientConfig {
    /// Query endpoint URL.
    pub endpoint: String,
    /// Operator contact folded into the user-agent header.
    pub contact: Option<String>,
    /// Maximum number of throttle retries before giving up. `None` retries
    /// indefinitely, preserving the long-standing behavior of this tool.
    pub max_retries: Option<u32>,
    /// Backoff used when the endpoint sends no `Retry-After` header.
    pub default_backoff: Duration,
}

impl Default for SparqlClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SPARQL_ENDPOINT.to_string(),
            contact: None,
            max_retries: None,
            default_backoff: DEFAULT_THROTTLE_BACKOFF,
        }
    }
}

/// Trait seam for running SPARQL queries, allowing mock endpoints in tests.
#[async_trait]
pub trait SparqlQuery: Send + Sync {
    /// Run one query and return its decoded result set.
    async fn run_query(&self, query: &str) -> Result<SparqlResults, ClientError>;
}

/// Client for the Wikidata SPARQL query endpoint.
pub struct SparqlClient {
    http: reqwest::Client,
    config: SparqlClientConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl SparqlClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SparqlClientConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/sparql-results+json"),
        );

        let http = reqwest::Client::builder()
            .user_agent(build_user_agent(config.contact.as_deref()))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            config,
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replace the sleeper used between throttle retries. Used in tests.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    async fn run_query_inner(&self, query: &str) -> Result<SparqlResults, ClientError> {
        let mut attempts: u32 = 0;

        loop {
            let response = self
                .http
                .post(&self.config.endpoint)
                .form(&[("query", query)])
                .send()
                .await?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                attempts += 1;
                if let Some(max) = self.config.max_retries {
                    if attempts > max {
                        return Err(ClientError::Throttled { attempts });
                    }
                }

                let delay =
                    retry_after(response.headers()).unwrap_or(self.config.default_backoff);
                warn!(
                    delay_secs = delay.as_secs(),
                    attempt = attempts,
                    "Query endpoint throttled the request, backing off"
                );
                self.sleeper.sleep(delay).await;
                continue;
            }

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ClientError::query_failed(status.as_u16(), body));
            }

            return Ok(response.json::<SparqlResults>().await?);
        }
    }
}

#[async_trait]
impl SparqlQuery for SparqlClient {
    async fn run_query(&self, query: &str) -> Result<SparqlResults, ClientError> {
        self.run_query_inner(query).await
    }
}

/// Parse the `Retry-After` header as a delay in whole seconds.
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Turn one open-ended SELECT query into an infinite sequence of paginated
/// sub-queries with strictly increasing offsets.
///
/// Fails fast when the query has no `SELECT` clause. A query without
/// `ORDER BY` only produces a warning: unordered pagination over a live
/// dataset can skip or duplicate rows across page boundaries, but that is a
/// caveat of the endpoint's cursor-less pagination, not something this
/// function can repair. A zero page size is clamped to one; `LIMIT 0` pages
/// would never satisfy the short-page termination check.
pub fn paginate_query(
    query: &str,
    page_size: usize,
) -> Result<impl Iterator<Item = String>, ClientError> {
    let page_size = page_size.max(1);
    let lowered = query.to_lowercase();
    if !lowered.contains("select") {
        return Err(ClientError::invalid_query(
            "query must contain a SELECT clause",
        ));
    }
    if !lowered.contains("order by") {
        warn!(
            "Query has no ORDER BY clause; pagination may skip or duplicate \
             entities across page boundaries"
        );
    }

    let query = query.to_string();
    Ok((0usize..).map(move |page| {
        format!(
            "{}\nLIMIT {}\nOFFSET {}",
            query,
            page_size,
            page * page_size
        )
    }))
}

/// Collect entity ids from a paginated query.
///
/// Pages are fetched strictly in order: the short-page check that terminates
/// pagination depends on the previous page's row count. The first projected
/// variable of every row is mapped to a QID via its URI. With `limit` set,
/// at most `ceil(limit / page_size)` pages are fetched; the final page is
/// not truncated, so slightly more than `limit` ids may be returned.
pub async fn get_entities_from_query<S: SparqlQuery>(
    client: &S,
    query: &str,
    page_size: usize,
    limit: Option<usize>,
) -> Result<Vec<String>, ClientError> {
    let page_size = page_size.max(1);
    let pages = paginate_query(query, page_size)?;
    let max_pages = limit.map(|limit| limit.div_ceil(page_size));

    let mut entities = Vec::new();

    for (page_index, page) in pages.enumerate() {
        if let Some(max) = max_pages {
            if page_index >= max {
                break;
            }
        }

        let results = client.run_query(&page).await?;

        let var = match results.head.vars.first() {
            Some(var) => var.clone(),
            None => {
                warn!("Query result has no projected variables; stopping pagination");
                break;
            }
        };

        let rows = results.row_count();
        for binding in &results.results.bindings {
            if let Some(value) = binding.get(&var) {
                if let Some(qid) = qid_from_uri(&value.value) {
                    entities.push(qid);
                }
            }
        }

        debug!(page = page_index, rows, total = entities.len(), "Fetched query page");

        // A short page means the result set is exhausted.
        if rows < page_size {
            break;
        }
    }

    info!(count = entities.len(), "Collected entity ids from query");
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn results_with_qids(qids: &[&str]) -> SparqlResults {
        let bindings: Vec<_> = qids
            .iter()
            .map(|qid| {
                json!({"item": {
                    "type": "uri",
                    "value": format!("http://www.wikidata.org/entity/{}", qid)
                }})
            })
            .collect();
        serde_json::from_value(json!({
            "head": {"vars": ["item"]},
            "results": {"bindings": bindings}
        }))
        .unwrap()
    }

    /// Mock endpoint emitting a fixed sequence of pages.
    struct PagedEndpoint {
        pages: Vec<Vec<String>>,
        calls: AtomicUsize,
    }

    impl PagedEndpoint {
        fn new(pages: Vec<Vec<String>>) -> Self {
            Self {
                pages,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SparqlQuery for PagedEndpoint {
        async fn run_query(&self, _query: &str) -> Result<SparqlResults, ClientError> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            let page = self.pages.get(index).cloned().unwrap_or_default();
            let qids: Vec<&str> = page.iter().map(String::as_str).collect();
            Ok(results_with_qids(&qids))
        }
    }

    #[test]
    fn test_paginate_rejects_non_select() {
        let result = paginate_query("ASK { ?s ?p ?o }", 10);
        assert!(matches!(result, Err(ClientError::InvalidQuery(_))));
    }

    #[test]
    fn test_paginate_offsets_strictly_increase() {
        let pages: Vec<String> = paginate_query("SELECT ?item WHERE { ?item ?p ?o }", 50)
            .unwrap()
            .take(3)
            .collect();

        assert!(pages[0].contains("LIMIT 50"));
        assert!(pages[0].contains("OFFSET 0"));
        assert!(pages[1].contains("OFFSET 50"));
        assert!(pages[2].contains("OFFSET 100"));
    }

    #[tokio::test]
    async fn test_short_page_terminates_pagination() {
        let endpoint = PagedEndpoint::new(vec![
            vec!["Q1".to_string(), "Q2".to_string()],
            vec!["Q3".to_string()],
            vec!["Q4".to_string(), "Q5".to_string()],
        ]);

        let entities = get_entities_from_query(&endpoint, "SELECT ?item WHERE {}", 2, None)
            .await
            .unwrap();

        // The short second page ends pagination; the third page is never requested.
        assert_eq!(entities, vec!["Q1", "Q2", "Q3"]);
        assert_eq!(endpoint.call_count(), 2);
    }

    #[tokio::test]
    async fn test_limit_caps_page_count() {
        let endpoint = PagedEndpoint::new(vec![
            vec!["Q1".to_string(), "Q2".to_string()],
            vec!["Q3".to_string(), "Q4".to_string()],
            vec!["Q5".to_string(), "Q6".to_string()],
        ]);

        let entities = get_entities_from_query(&endpoint, "SELECT ?item WHERE {}", 2, Some(3))
            .await
            .unwrap();

        // ceil(3 / 2) = 2 pages; the final page is not truncated to the limit.
        assert_eq!(endpoint.call_count(), 2);
        assert_eq!(entities, vec!["Q1", "Q2", "Q3", "Q4"]);
    }

    #[tokio::test]
    async fn test_exact_final_page_stops_on_empty_page() {
        let endpoint = PagedEndpoint::new(vec![
            vec!["Q1".to_string(), "Q2".to_string()],
            vec![],
        ]);

        let entities = get_entities_from_query(&endpoint, "SELECT ?item WHERE {}", 2, None)
            .await
            .unwrap();

        assert_eq!(entities, vec!["Q1", "Q2"]);
        assert_eq!(endpoint.call_count(), 2);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let pages: Vec<String> = paginate_query("SELECT ?item WHERE { ?item ?p ?o }", 0)
            .unwrap()
            .take(2)
            .collect();

        assert!(pages[0].contains("LIMIT 1"));
        assert!(pages[1].contains("OFFSET 1"));
    }

    #[tokio::test]
    async fn test_zero_page_size_terminates_with_limit() {
        let endpoint = PagedEndpoint::new(vec![vec!["Q1".to_string()]]);

        let entities = get_entities_from_query(&endpoint, "SELECT ?item WHERE {}", 0, Some(5))
            .await
            .unwrap();

        // Clamped to a page size of one; the empty second page ends the run.
        assert_eq!(entities, vec!["Q1"]);
        assert_eq!(endpoint.call_count(), 2);
    }

    #[test]
    fn test_retry_after_parses_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("3"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_retry_after_absent() {
        assert_eq!(retry_after(&HeaderMap::new()), None);
    }
}
