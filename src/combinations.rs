//! Cartesian expansion of matched field values into campaign drafts.

use std::collections::BTreeMap;

use crate::campaign::CampaignDraft;
use crate::extractor::FieldMatches;
use crate::vocabulary::{FieldId, VocabularyError, VocabularyRegistry};

/// Which fields must be filled and which fall back to a default value.
///
/// A field with matches always uses them. Otherwise a configured default is
/// used, and a field with neither stays unset; unset fields are only reported
/// when listed in `required`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftPolicy {
    required: Vec<FieldId>,
    defaults: BTreeMap<FieldId, String>,
}

impl Default for DraftPolicy {
    fn default() -> Self {
        Self {
            required: vec![FieldId::TrafficAccount, FieldId::Offer, FieldId::Country],
            defaults: BTreeMap::from([
                (FieldId::Rk, "РК-001".to_owned()),
                (FieldId::Pixel, "Facebook Pixel".to_owned()),
            ]),
        }
    }
}

impl DraftPolicy {
    /// Build a policy, normalising defaults against the vocabularies.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::UnknownValue`] if a default is not canonical.
    pub fn new(
        required: Vec<FieldId>,
        defaults: BTreeMap<FieldId, String>,
        registry: &VocabularyRegistry,
    ) -> Result<Self, VocabularyError> {
        let mut checked = BTreeMap::new();
        for (field, value) in defaults {
            checked.insert(field, registry.canonicalize(field, &value)?);
        }
        let mut unique = Vec::with_capacity(required.len());
        for field in required {
            if !unique.contains(&field) {
                unique.push(field);
            }
        }
        Ok(Self {
            required: unique,
            defaults: checked,
        })
    }

    /// Fields that are reported when unset.
    pub fn required(&self) -> &[FieldId] {
        &self.required
    }

    /// Default value for a field, if configured.
    pub fn default_for(&self, field: FieldId) -> Option<&str> {
        self.defaults.get(&field).map(String::as_str)
    }

    /// Fill unset fields that have a default.
    pub fn apply_defaults(&self, draft: &mut CampaignDraft) {
        for (field, value) in &self.defaults {
            if draft.get(*field).is_none() {
                draft.set(*field, Some(value.clone()));
            }
        }
    }
}

/// Expand per-field matches into the full cartesian product of drafts.
///
/// Fields are combined in [`FieldId::ALL`] order with the first field varying
/// slowest. Each field contributes at least one slot (its default or unset),
/// so the result is never empty.
pub fn expand(matches: &FieldMatches, policy: &DraftPolicy) -> Vec<CampaignDraft> {
    let mut drafts = vec![CampaignDraft::default()];

    for field in FieldId::ALL {
        let matched = matches.get(field);
        let slots: Vec<Option<String>> = if matched.is_empty() {
            vec![policy.default_for(field).map(str::to_owned)]
        } else {
            matched.iter().cloned().map(Some).collect()
        };

        drafts = drafts
            .iter()
            .flat_map(|draft| {
                slots.iter().map(move |slot| {
                    let mut next = draft.clone();
                    next.set(field, slot.clone());
                    next
                })
            })
            .collect();
    }

    drafts
}
