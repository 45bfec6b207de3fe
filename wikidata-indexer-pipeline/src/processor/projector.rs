//! Claim projector implementation.
//!
//! Projects raw entity records into normalized documents for a target
//! language and property set. Projection is pure and total: a record missing
//! labels, descriptions, aliases or claims still yields a document, and a
//! claim value whose kind has no mapped extraction field is dropped on its
//! own without affecting the rest of the claim list.

use tracing::debug;

use wikidata_indexer_shared::{NormalizedDocument, PropertyId, RawEntity};

/// Projects raw entity records into normalized documents.
#[derive(Debug, Clone)]
pub struct ClaimProjector {
    lang: String,
    properties: Vec<PropertyId>,
    use_redirected_ids: bool,
}

impl ClaimProjector {
    /// Create a projector for the given language and property set.
    pub fn new(lang: impl Into<String>, properties: Vec<PropertyId>) -> Self {
        Self {
            lang: lang.into(),
            properties,
            use_redirected_ids: false,
        }
    }

    /// For records carrying redirect info, use the redirect target id
    /// instead of the original id.
    pub fn with_redirected_ids(mut self, use_redirected_ids: bool) -> Self {
        self.use_redirected_ids = use_redirected_ids;
        self
    }

    /// The target language code.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Project one raw record into a normalized document.
    pub fn project(&self, raw: &RawEntity) -> NormalizedDocument {
        let id = match &raw.redirects {
            Some(redirect) if self.use_redirected_ids => redirect.to.clone(),
            Some(redirect) => redirect.from.clone(),
            None => raw.id.clone(),
        };

        let mut document = NormalizedDocument::new(id);

        document.labels = raw.labels.get(&self.lang).map(|label| label.value.clone());
        document.descriptions = raw
            .descriptions
            .get(&self.lang)
            .map(|description| description.value.clone());
        document.aliases = raw
            .aliases
            .get(&self.lang)
            .map(|aliases| aliases.iter().map(|alias| alias.value.clone()).collect())
            .unwrap_or_default();

        for property in &self.properties {
            if let Some(claims) = raw.claims.get(property.as_str()) {
                let values: Vec<String> = claims
                    .iter()
                    .filter_map(|claim| claim.mainsnak.as_ref())
                    .filter_map(|snak| snak.datavalue.as_ref())
                    .filter_map(|datavalue| {
                        let value = datavalue.projected();
                        if value.is_none() {
                            debug!(
                                property = %property,
                                entity = %document.id,
                                "Dropping claim value with unmapped kind"
                            );
                        }
                        value
                    })
                    .collect();
                document.claims.insert(property.as_str().to_string(), values);
            }
        }

        document
    }
}
