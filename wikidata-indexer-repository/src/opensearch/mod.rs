//! OpenSearch backend implementation.

mod client;
mod index_config;

pub use client::OpenSearchIndexClient;
pub use index_config::index_settings;
