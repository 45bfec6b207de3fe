//! Entry point for the Wikidata search indexer.

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wikidata_indexer::{Dependencies, IndexingError, RuntimeConfig};

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RuntimeConfig::from_env()?;
    let dependencies = Dependencies::new(&config)?;

    let summary = dependencies.run(&config).await?;

    info!(
        successes = summary.successes,
        failed = summary.failed.len(),
        "Indexing run complete"
    );

    for action in &summary.failed {
        error!(id = %action.id, body = %action.body, "Document was rejected by the index");
    }

    Ok(())
}
