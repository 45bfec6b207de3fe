//! The flattened document shape loaded into the search index.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A normalized entity document, the sole artifact persisted to the index.
///
/// `labels` and `descriptions` are omitted entirely when the target language
/// has no entry (never serialized as null). `aliases` is always present,
/// defaulting to an empty list; the asymmetry is deliberate and matches the
/// dump-era document shape consumers already rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub claims: BTreeMap<String, Vec<String>>,
}

impl NormalizedDocument {
    /// Create an empty document for the given entity id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            labels: None,
            descriptions: None,
            aliases: Vec::new(),
            claims: BTreeMap::new(),
        }
    }
}

/// One `{id, body}` write submitted as part of a bulk request.
#[derive(Debug, Clone)]
pub struct BulkAction {
    pub id: String,
    pub body: Value,
}

impl TryFrom<NormalizedDocument> for BulkAction {
    type Error = serde_json::Error;

    fn try_from(document: NormalizedDocument) -> Result<Self, Self::Error> {
        let id = document.id.clone();
        let body = serde_json::to_value(document)?;
        Ok(Self { id, body })
    }
}
