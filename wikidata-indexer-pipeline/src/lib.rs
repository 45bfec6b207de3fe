//! # Wikidata Indexer Pipeline
//!
//! This crate provides the pipeline components for retrieving Wikidata
//! entity records and indexing them into the search engine.
//!
//! ## Architecture
//!
//! The pipeline follows the Source-Processor-Loader pattern:
//!
//! 1. **Source**: Streams raw entity records from a dump file, or from a
//!    SPARQL query followed by entity-API fetches
//! 2. **Processor**: Projects each raw record into a normalized document
//! 3. **Loader**: Bulk-writes documents with bounded concurrency
//! 4. **Orchestrator**: Wires a source into the processor and loader

pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod source;

pub use errors::PipelineError;
pub use loader::{BulkLoader, LoaderConfig};
pub use orchestrator::IndexingPipeline;
pub use processor::ClaimProjector;
