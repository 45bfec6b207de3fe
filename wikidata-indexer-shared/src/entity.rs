//! Raw Wikidata entity records.
//!
//! These structures mirror the JSON shape shared by the entity dump (one
//! record per line) and the `wbgetentities` API response. Decoding is
//! defensive throughout: optional keys are modeled as `Option` or defaulted
//! collections, and claim values with an unrecognized datavalue kind decode
//! into [`DataValue::Unknown`] instead of failing the record.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static QID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Q\d+").expect("entity id pattern is valid"));

/// Extract a QID from an entity URI,
/// e.g. `http://www.wikidata.org/entity/Q7187777` -> `Q7187777`.
pub fn qid_from_uri(uri: &str) -> Option<String> {
    QID_PATTERN.find(uri).map(|m| m.as_str().to_string())
}

/// A raw entity record from the dump or the entity API.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEntity {
    pub id: String,
    #[serde(default)]
    pub redirects: Option<Redirect>,
    #[serde(default)]
    pub labels: HashMap<String, LangValue>,
    #[serde(default)]
    pub descriptions: HashMap<String, LangValue>,
    #[serde(default)]
    pub aliases: HashMap<String, Vec<LangValue>>,
    #[serde(default)]
    pub claims: HashMap<String, Vec<Claim>>,
}

/// Redirect information attached to a record whose QID was merged.
#[derive(Debug, Clone, Deserialize)]
pub struct Redirect {
    pub from: String,
    pub to: String,
}

/// A single language-tagged term (label, description or alias).
#[derive(Debug, Clone, Deserialize)]
pub struct LangValue {
    #[serde(default)]
    pub language: String,
    pub value: String,
}

/// One claim (property-value assertion) on an entity.
#[derive(Debug, Clone, Deserialize)]
pub struct Claim {
    #[serde(default)]
    pub mainsnak: Option<Snak>,
}

/// The main snak of a claim. `novalue`/`somevalue` snaks carry no datavalue.
#[derive(Debug, Clone, Deserialize)]
pub struct Snak {
    #[serde(default)]
    pub datavalue: Option<DataValue>,
}

/// A typed claim value, tagged by the `type` field of the datavalue.
///
/// Kinds outside the closed set decode into `Unknown` and are dropped at
/// projection time; they never abort decoding of the surrounding record.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum DataValue {
    #[serde(rename = "string")]
    String(String),
    #[serde(rename = "wikibase-entityid")]
    EntityRef(EntityRefValue),
    #[serde(rename = "time")]
    Time(TimeValue),
    #[serde(rename = "monolingualtext")]
    MonolingualText(MonolingualTextValue),
    #[serde(rename = "quantity")]
    Quantity(QuantityValue),
    #[serde(other)]
    Unknown,
}

impl DataValue {
    /// The projected string form of this value, or `None` when the kind has
    /// no mapped extraction field (including `Unknown`).
    pub fn projected(&self) -> Option<String> {
        match self {
            Self::String(s) => Some(s.clone()),
            Self::EntityRef(v) => v.id.clone(),
            Self::Time(v) => v.time.clone(),
            Self::MonolingualText(v) => v.text.clone(),
            Self::Quantity(v) => v.amount.clone(),
            Self::Unknown => None,
        }
    }
}

/// Value payload of a `wikibase-entityid` datavalue.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityRefValue {
    #[serde(default)]
    pub id: Option<String>,
}

/// Value payload of a `time` datavalue. Only the raw time literal is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeValue {
    #[serde(default)]
    pub time: Option<String>,
}

/// Value payload of a `monolingualtext` datavalue.
#[derive(Debug, Clone, Deserialize)]
pub struct MonolingualTextValue {
    #[serde(default)]
    pub text: Option<String>,
}

/// Value payload of a `quantity` datavalue. Only the amount is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct QuantityValue {
    #[serde(default)]
    pub amount: Option<String>,
}
