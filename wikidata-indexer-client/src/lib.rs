//! # Wikidata Indexer Client
//!
//! HTTP clients for the Wikidata side of the pipeline:
//!
//! - [`sparql::SparqlClient`]: runs SPARQL queries against the query
//!   endpoint, with pagination helpers and throttle-aware retries.
//! - [`entities::EntityFetcher`]: batch-fetches full entity records through
//!   the `wbgetentities` API, streamed page by page.
//!
//! Both clients identify the tool through a Wikimedia-policy-compliant
//! user-agent header built by [`user_agent::build_user_agent`].

pub mod entities;
pub mod errors;
pub mod sparql;
pub mod user_agent;

pub use entities::{EntityFetcher, EntityFetcherConfig};
pub use errors::ClientError;
pub use sparql::{
    get_entities_from_query, paginate_query, Sleeper, SparqlClient, SparqlClientConfig,
    SparqlQuery, TokioSleeper,
};
