//! Index settings and mappings for the entity index.

use serde_json::{json, Value};

/// Get the index settings and mappings for the entity index.
///
/// Labels, descriptions and aliases are full-text fields; claim values are
/// keyed by property id under a dynamic `claims` object and indexed as
/// keywords, since they are ids and raw literals rather than prose.
pub fn index_settings() -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": {
                "id": {
                    "type": "keyword"
                },
                "labels": {
                    "type": "text"
                },
                "descriptions": {
                    "type": "text"
                },
                "aliases": {
                    "type": "text"
                },
                "claims": {
                    "type": "object",
                    "dynamic": true
                }
            },
            "dynamic_templates": [
                {
                    "claim_values_as_keywords": {
                        "path_match": "claims.*",
                        "mapping": {
                            "type": "keyword"
                        }
                    }
                }
            ]
        }
    })
}
