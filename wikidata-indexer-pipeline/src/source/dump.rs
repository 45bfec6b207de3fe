//! Line-delimited dump file source.
//!
//! Each line of the dump is one independent JSON entity record. Records are
//! streamed line by line so indexing can begin while the file is still being
//! read. A malformed line aborts the run with its line number.

use std::path::Path;

use futures::stream::{Stream, StreamExt};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;
use tracing::info;

use crate::errors::PipelineError;
use wikidata_indexer_shared::RawEntity;

/// Open a dump file as a stream of raw entity records.
pub async fn open_dump(
    path: impl AsRef<Path>,
) -> Result<impl Stream<Item = Result<RawEntity, PipelineError>>, PipelineError> {
    let path = path.as_ref();
    let file = File::open(path).await?;
    info!(path = %path.display(), "Reading entity dump");

    let lines = LinesStream::new(BufReader::new(file).lines());

    let mut line_number = 0usize;
    Ok(lines.map(move |line| {
        line_number += 1;
        let line = line?;
        serde_json::from_str::<RawEntity>(&line)
            .map_err(|e| PipelineError::malformed_line(line_number, e))
    }))
}
