//! # Wikidata Indexer Shared
//!
//! Shared types and data structures for the Wikidata search indexer system.
//!
//! This crate defines the data model that flows through the pipeline: raw
//! entity records as returned by a dump file or the `wbgetentities` API,
//! validated property identifiers, the flattened document shape loaded into
//! the search index, and the wire shape of SPARQL query results.

pub mod document;
pub mod entity;
pub mod property;
pub mod sparql;

pub use document::{BulkAction, NormalizedDocument};
pub use entity::{qid_from_uri, Claim, DataValue, LangValue, RawEntity, Redirect, Snak};
pub use property::{parse_property_list, PropertyId, PropertyIdError};
pub use sparql::SparqlResults;
