//! Result types for bulk index operations.

use serde_json::Value;

/// Outcome of one failed bulk action, with the engine's response body.
#[derive(Debug, Clone)]
pub struct FailedAction {
    /// Document id of the failed action.
    pub id: String,
    /// The per-item response body returned by the engine.
    pub body: Value,
}

/// Per-action accounting for a bulk write.
///
/// One failing document never fails the batch; it is recorded here and the
/// run continues.
#[derive(Debug, Clone, Default)]
pub struct BulkSummary {
    /// Number of actions acknowledged as successful.
    pub successes: usize,
    /// Actions the engine rejected, with their response bodies.
    pub failed: Vec<FailedAction>,
}

impl BulkSummary {
    /// Total number of actions accounted for.
    pub fn total(&self) -> usize {
        self.successes + self.failed.len()
    }

    /// Merge another summary into this one.
    pub fn merge(&mut self, other: BulkSummary) {
        self.successes += other.successes;
        self.failed.extend(other.failed);
    }
}
