//! Cartesian expansion and draft policies.

use std::collections::{BTreeMap, HashSet};

use kampania::campaign::CampaignDraft;
use kampania::combinations::{expand, DraftPolicy};
use kampania::extractor::{extract, FieldMatches};
use kampania::vocabulary::{FieldId, VocabularyError, VocabularyRegistry};

fn values(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_owned()).collect()
}

#[test]
fn two_offers_three_countries_make_six_unique_drafts() {
    let mut matches = FieldMatches::default();
    matches.insert(FieldId::TrafficAccount, values(&["Мета"]));
    matches.insert(FieldId::Offer, values(&["Крипто", "Нутра"]));
    matches.insert(FieldId::Country, values(&["Германия", "Франция", "Польша"]));

    let drafts = expand(&matches, &DraftPolicy::default());
    assert_eq!(drafts.len(), 6);

    let unique: HashSet<&CampaignDraft> = drafts.iter().collect();
    assert_eq!(unique.len(), 6);

    let first = drafts.first().expect("six drafts");
    assert_eq!(first.offer.as_deref(), Some("Крипто"));
    assert_eq!(first.country.as_deref(), Some("Германия"));
    let second = drafts.get(1).expect("six drafts");
    assert_eq!(second.offer.as_deref(), Some("Крипто"));
    assert_eq!(second.country.as_deref(), Some("Франция"));
    let last = drafts.last().expect("six drafts");
    assert_eq!(last.offer.as_deref(), Some("Нутра"));
    assert_eq!(last.country.as_deref(), Some("Польша"));

    for draft in &drafts {
        assert_eq!(draft.traffic_account.as_deref(), Some("Мета"));
        assert_eq!(draft.rk.as_deref(), Some("РК-001"));
        assert_eq!(draft.pixel.as_deref(), Some("Facebook Pixel"));
    }
}

#[test]
fn no_keywords_yield_one_default_draft() {
    let registry = VocabularyRegistry::builtin();
    let matches = extract("просто текст", &registry);
    let drafts = expand(&matches, &DraftPolicy::default());

    assert_eq!(
        drafts,
        vec![CampaignDraft {
            rk: Some("РК-001".to_owned()),
            pixel: Some("Facebook Pixel".to_owned()),
            ..CampaignDraft::default()
        }]
    );
}

#[test]
fn policy_without_defaults_leaves_fields_unset() {
    let registry = VocabularyRegistry::builtin();
    let policy = DraftPolicy::new(Vec::new(), BTreeMap::new(), &registry)
        .expect("empty policy is valid");
    let drafts = expand(&FieldMatches::default(), &policy);
    assert_eq!(drafts, vec![CampaignDraft::default()]);
}

#[test]
fn matched_values_override_defaults() {
    let mut matches = FieldMatches::default();
    matches.insert(FieldId::Rk, values(&["РК-002", "РК-003"]));
    let drafts = expand(&matches, &DraftPolicy::default());

    let tiers: Vec<Option<&str>> = drafts.iter().map(|d| d.rk.as_deref()).collect();
    assert_eq!(tiers, vec![Some("РК-002"), Some("РК-003")]);
}

#[test]
fn policy_canonicalizes_defaults_and_dedups_required() {
    let registry = VocabularyRegistry::builtin();
    let policy = DraftPolicy::new(
        vec![FieldId::Offer, FieldId::Offer, FieldId::Country],
        BTreeMap::from([(FieldId::Pixel, "яндекс метрика".to_owned())]),
        &registry,
    )
    .expect("default is canonical");

    assert_eq!(policy.required(), [FieldId::Offer, FieldId::Country]);
    assert_eq!(policy.default_for(FieldId::Pixel), Some("Яндекс Метрика"));
    assert_eq!(policy.default_for(FieldId::Rk), None);
}

#[test]
fn policy_rejects_unknown_default() {
    let registry = VocabularyRegistry::builtin();
    let result = DraftPolicy::new(
        Vec::new(),
        BTreeMap::from([(FieldId::Rk, "РК-100".to_owned())]),
        &registry,
    );
    assert_eq!(
        result,
        Err(VocabularyError::UnknownValue {
            field: FieldId::Rk,
            value: "РК-100".to_owned(),
        })
    );
}

#[test]
fn apply_defaults_keeps_set_fields() {
    let mut draft = CampaignDraft {
        pixel: Some("TikTok Pixel".to_owned()),
        ..CampaignDraft::default()
    };
    DraftPolicy::default().apply_defaults(&mut draft);
    assert_eq!(draft.pixel.as_deref(), Some("TikTok Pixel"));
    assert_eq!(draft.rk.as_deref(), Some("РК-001"));
    assert_eq!(draft.offer, None);
}
