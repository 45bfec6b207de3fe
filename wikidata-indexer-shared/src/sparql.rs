//! Wire shape of SPARQL JSON query results.

use std::collections::HashMap;

use serde::Deserialize;

/// The JSON result of a SPARQL query: projected variable names plus an
/// ordered list of binding rows.
#[derive(Debug, Clone, Deserialize)]
pub struct SparqlResults {
    pub head: SparqlHead,
    pub results: SparqlBindings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SparqlBindings {
    #[serde(default)]
    pub bindings: Vec<HashMap<String, BindingValue>>,
}

/// A single variable binding within a result row. Only the value is kept;
/// the datatype and language tags are not needed for id extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct BindingValue {
    pub value: String,
}

impl SparqlResults {
    /// Number of rows in the result set.
    pub fn row_count(&self) -> usize {
        self.results.bindings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_results() {
        let results: SparqlResults = serde_json::from_value(json!({
            "head": {"vars": ["item", "itemLabel"]},
            "results": {"bindings": [
                {"item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q1"}},
                {"item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q2"}}
            ]}
        }))
        .unwrap();

        assert_eq!(results.head.vars[0], "item");
        assert_eq!(results.row_count(), 2);
        assert_eq!(
            results.results.bindings[1]["item"].value,
            "http://www.wikidata.org/entity/Q2"
        );
    }
}
