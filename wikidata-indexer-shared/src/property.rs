//! Validated Wikidata property identifiers.
//!
//! Property ids (`P31`, `P279`, ...) arrive from operator configuration and
//! are not trusted: input is case-insensitive and may contain typos. Invalid
//! ids are dropped with a warning rather than failing the run.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

static PID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[Pp]\d+$").expect("property id pattern is valid"));

/// Error returned when a string is not a valid Wikidata property id.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("'{0}' is not a valid Wikidata property id")]
pub struct PropertyIdError(pub String);

/// A validated Wikidata property identifier, normalized to uppercase.
///
/// Parsing accepts lowercase input (`p31` and `P31` are the same property)
/// and rejects anything that is not a `P` followed by digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(String);

impl PropertyId {
    /// The normalized (uppercase) property id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PropertyId {
    type Err = PropertyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if PID_PATTERN.is_match(trimmed) {
            Ok(Self(trimmed.to_uppercase()))
        } else {
            Err(PropertyIdError(trimmed.to_string()))
        }
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a comma-joined operator string (e.g. `"p31,p21"`) into property ids.
///
/// Invalid entries are dropped with a warning; they never fail the run.
pub fn parse_property_list(input: &str) -> Vec<PropertyId> {
    input
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .filter_map(|part| match part.parse::<PropertyId>() {
            Ok(property) => Some(property),
            Err(e) => {
                warn!(property = part.trim(), error = %e, "Dropping invalid property id");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_is_normalized() {
        let property: PropertyId = "p31".parse().unwrap();
        assert_eq!(property.as_str(), "P31");
    }

    #[test]
    fn test_uppercase_passes_through() {
        let property: PropertyId = "P279".parse().unwrap();
        assert_eq!(property.as_str(), "P279");
    }

    #[test]
    fn test_invalid_ids_are_rejected() {
        assert!("x7".parse::<PropertyId>().is_err());
        assert!("P31a".parse::<PropertyId>().is_err());
        assert!("Q31".parse::<PropertyId>().is_err());
        assert!("".parse::<PropertyId>().is_err());
    }

    #[test]
    fn test_parse_property_list_drops_invalid() {
        let properties = parse_property_list("p31,x7,P21");
        let ids: Vec<&str> = properties.iter().map(PropertyId::as_str).collect();
        assert_eq!(ids, vec!["P31", "P21"]);
    }

    #[test]
    fn test_parse_property_list_trims_whitespace() {
        let properties = parse_property_list("p31, p21");
        let ids: Vec<&str> = properties.iter().map(PropertyId::as_str).collect();
        assert_eq!(ids, vec!["P31", "P21"]);
    }
}
