//! Keyword entity extractor.
//!
//! Matching is plain substring containment on the lowercased message: no
//! tokenization, no word boundaries. Every canonical value is its own
//! trigger phrase; all hits for a field are kept so that one sentence can
//! name several offers or countries.

use std::collections::BTreeMap;

use tracing::debug;

use crate::vocabulary::{FieldId, FieldVocabulary, VocabularyRegistry};

/// Canonical values matched per field. Every field is present; a field with
/// no hits maps to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMatches {
    values: BTreeMap<FieldId, Vec<String>>,
}

impl FieldMatches {
    /// Matches for a field (empty when nothing matched).
    pub fn get(&self, field: FieldId) -> &[String] {
        self.values.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace the matches for a field.
    pub fn insert(&mut self, field: FieldId, values: Vec<String>) {
        self.values.insert(field, values);
    }

    /// True when no field matched anything.
    pub fn is_empty(&self) -> bool {
        self.values.values().all(Vec::is_empty)
    }

    /// Fields with at least one match, in canonical order.
    pub fn matched_fields(&self) -> Vec<FieldId> {
        FieldId::ALL
            .into_iter()
            .filter(|field| !self.get(*field).is_empty())
            .collect()
    }
}

/// Extract canonical values for every field from free-form text.
pub fn extract(text: &str, registry: &VocabularyRegistry) -> FieldMatches {
    let lower = text.to_lowercase();
    let mut matches = FieldMatches::default();
    for vocabulary in registry.iter() {
        let values = match_field(vocabulary, &lower);
        debug!(field = %vocabulary.field(), ?values, "field extraction");
        matches.insert(vocabulary.field(), values);
    }
    matches
}

/// Resolve all canonical values of one field named in lowercased text.
///
/// Accepted pattern hits take precedence; otherwise canonical spellings and
/// synonyms are searched. The result is deduplicated and ordered by the
/// vocabulary's canonical order.
pub fn match_field(vocabulary: &FieldVocabulary, lower: &str) -> Vec<String> {
    let from_pattern = vocabulary.pattern_values(lower);
    if !from_pattern.is_empty() {
        return in_canonical_order(vocabulary, &from_pattern);
    }

    let mut hits = vocabulary.canonical_hits(lower);
    hits.extend(vocabulary.synonym_hits(lower));
    in_canonical_order(vocabulary, &hits)
}

fn in_canonical_order(vocabulary: &FieldVocabulary, hits: &[&str]) -> Vec<String> {
    vocabulary
        .canonical_values()
        .iter()
        .filter(|value| hits.contains(&value.as_str()))
        .cloned()
        .collect()
}
