//! End-to-end pipeline tests with a mocked search index.

use std::collections::HashSet;
use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wikidata_indexer_client::{
    ClientError, EntityFetcher, EntityFetcherConfig, SparqlQuery,
};
use wikidata_indexer_pipeline::{BulkLoader, ClaimProjector, IndexingPipeline};
use wikidata_indexer_repository::{
    BulkSummary, FailedAction, SearchIndexError, SearchIndexProvider,
};
use wikidata_indexer_shared::{BulkAction, SparqlResults};

/// In-memory search index accepting every write unless told otherwise.
struct InMemoryIndex {
    ensured: Mutex<Vec<String>>,
    documents: Mutex<Vec<BulkAction>>,
    failing_ids: HashSet<String>,
}

impl InMemoryIndex {
    fn new() -> Self {
        Self {
            ensured: Mutex::new(Vec::new()),
            documents: Mutex::new(Vec::new()),
            failing_ids: HashSet::new(),
        }
    }

    fn document_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .documents
            .lock()
            .unwrap()
            .iter()
            .map(|action| action.id.clone())
            .collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl SearchIndexProvider for InMemoryIndex {
    async fn ensure_index(&self, index: &str) -> Result<(), SearchIndexError> {
        self.ensured.lock().unwrap().push(index.to_string());
        Ok(())
    }

    async fn bulk_write(
        &self,
        _index: &str,
        actions: Vec<BulkAction>,
    ) -> Result<BulkSummary, SearchIndexError> {
        let mut summary = BulkSummary::default();
        for action in actions {
            if self.failing_ids.contains(&action.id) {
                summary.failed.push(FailedAction {
                    id: action.id,
                    body: json!({"error": {"type": "rejected"}}),
                });
            } else {
                summary.successes += 1;
                self.documents.lock().unwrap().push(action);
            }
        }
        Ok(summary)
    }
}

fn pipeline(index: Arc<InMemoryIndex>) -> IndexingPipeline {
    let projector = ClaimProjector::new("en", vec!["P31".parse().unwrap()]);
    let loader = BulkLoader::new(index);
    IndexingPipeline::new(projector, loader, "entities")
}

fn dump_line(qid: &str, label: &str) -> String {
    json!({
        "id": qid,
        "labels": {"en": {"language": "en", "value": label}},
        "descriptions": {},
        "aliases": {},
        "claims": {
            "P31": [{"mainsnak": {"datavalue": {"value": {"entity-type": "item", "id": "Q5"}, "type": "wikibase-entityid"}}}]
        }
    })
    .to_string()
}

#[tokio::test]
async fn dump_run_indexes_every_line() {
    let mut file = NamedTempFile::new().unwrap();
    for (qid, label) in [("Q1", "one"), ("Q2", "two"), ("Q3", "three")] {
        writeln!(file, "{}", dump_line(qid, label)).unwrap();
    }

    let index = Arc::new(InMemoryIndex::new());
    let summary = pipeline(index.clone())
        .run_from_dump(file.path())
        .await
        .unwrap();

    assert_eq!(summary.successes, 3);
    assert!(summary.failed.is_empty());
    assert_eq!(index.document_ids(), vec!["Q1", "Q2", "Q3"]);
    assert_eq!(index.ensured.lock().unwrap().as_slice(), ["entities"]);

    // Projection carried labels and claims through to the stored body.
    let documents = index.documents.lock().unwrap();
    let q1 = documents.iter().find(|action| action.id == "Q1").unwrap();
    assert_eq!(q1.body["labels"], "one");
    assert_eq!(q1.body["claims"]["P31"][0], "Q5");
}

#[tokio::test]
async fn dump_run_aborts_on_malformed_line() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", dump_line("Q1", "one")).unwrap();
    writeln!(file, "this is not json").unwrap();

    let index = Arc::new(InMemoryIndex::new());
    let result = pipeline(index).run_from_dump(file.path()).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn dump_run_reports_rejected_documents() {
    let mut file = NamedTempFile::new().unwrap();
    for (qid, label) in [("Q1", "one"), ("Q2", "two"), ("Q3", "three")] {
        writeln!(file, "{}", dump_line(qid, label)).unwrap();
    }

    let mut index = InMemoryIndex::new();
    index.failing_ids = ["Q2".to_string()].into_iter().collect();
    let index = Arc::new(index);

    let summary = pipeline(index.clone())
        .run_from_dump(file.path())
        .await
        .unwrap();

    assert_eq!(summary.successes, 2);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].id, "Q2");
    assert_eq!(index.document_ids(), vec!["Q1", "Q3"]);
}

/// Mock SPARQL endpoint returning one fixed page.
struct SinglePageSparql {
    qids: Vec<&'static str>,
}

#[async_trait]
impl SparqlQuery for SinglePageSparql {
    async fn run_query(&self, _query: &str) -> Result<SparqlResults, ClientError> {
        let bindings: Vec<_> = self
            .qids
            .iter()
            .map(|qid| {
                json!({"item": {
                    "type": "uri",
                    "value": format!("http://www.wikidata.org/entity/{}", qid)
                }})
            })
            .collect();
        Ok(serde_json::from_value(json!({
            "head": {"vars": ["item"]},
            "results": {"bindings": bindings}
        }))
        .unwrap())
    }
}

#[tokio::test]
async fn query_run_fetches_and_indexes_entities() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("ids", "Q1|Q2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entities": {
                "Q1": {"id": "Q1", "labels": {"en": {"language": "en", "value": "one"}}},
                "Q2": {"id": "Q2", "labels": {"en": {"language": "en", "value": "two"}}}
            },
            "success": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = EntityFetcher::new(EntityFetcherConfig {
        endpoint: format!("{}/w/api.php", server.uri()),
        ..Default::default()
    })
    .unwrap();

    let sparql = SinglePageSparql {
        qids: vec!["Q1", "Q2"],
    };

    let index = Arc::new(InMemoryIndex::new());
    let summary = pipeline(index.clone())
        .run_from_query(&sparql, &fetcher, "SELECT ?item WHERE { ?item ?p ?o } ORDER BY ?item", 100, None)
        .await
        .unwrap();

    assert_eq!(summary.successes, 2);
    assert!(summary.failed.is_empty());
    assert_eq!(index.document_ids(), vec!["Q1", "Q2"]);
}
