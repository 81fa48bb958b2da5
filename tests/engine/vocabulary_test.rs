//! Vocabulary registry, field identifiers, and keyword edits.

use kampania::vocabulary::{FieldId, VocabularyError, VocabularyRegistry};

#[test]
fn field_keys_round_trip_through_from_str() {
    for field in FieldId::ALL {
        let parsed: Result<FieldId, _> = field.key().parse();
        assert_eq!(parsed, Ok(field));
    }
    assert_eq!("TrafficAccount".parse::<FieldId>(), Ok(FieldId::TrafficAccount));
    assert_eq!(
        "budget".parse::<FieldId>(),
        Err(VocabularyError::UnknownField("budget".to_owned()))
    );
}

#[test]
fn field_serializes_as_wire_key() {
    let json = serde_json::to_string(&FieldId::TrafficAccount).expect("field should serialize");
    assert_eq!(json, "\"trafficAccount\"");
    let field: FieldId = serde_json::from_str("\"pixel\"").expect("field should deserialize");
    assert_eq!(field, FieldId::Pixel);
}

#[test]
fn builtin_value_tables() {
    let registry = VocabularyRegistry::builtin();
    assert_eq!(
        registry.get(FieldId::TrafficAccount).canonical_values(),
        ["Мета", "ТикТок"]
    );
    assert_eq!(registry.get(FieldId::Offer).canonical_values().len(), 10);
    assert_eq!(registry.get(FieldId::Country).canonical_values().len(), 20);
    assert_eq!(registry.get(FieldId::Pixel).canonical_values().len(), 4);

    let rk = registry.get(FieldId::Rk).canonical_values();
    assert_eq!(rk.len(), 10);
    assert_eq!(rk.first().map(String::as_str), Some("РК-001"));
    assert_eq!(rk.last().map(String::as_str), Some("РК-010"));
}

#[test]
fn canonicalize_ignores_case_and_padding() {
    let registry = VocabularyRegistry::builtin();
    assert_eq!(
        registry.canonicalize(FieldId::Country, "  сша "),
        Ok("США".to_owned())
    );
    assert_eq!(
        registry.canonicalize(FieldId::Rk, "рк-005"),
        Ok("РК-005".to_owned())
    );
    assert_eq!(
        registry.canonicalize(FieldId::Offer, "Недвижимость"),
        Err(VocabularyError::UnknownValue {
            field: FieldId::Offer,
            value: "Недвижимость".to_owned(),
        })
    );
}

#[test]
fn add_synonym_requires_canonical_target() {
    let mut registry = VocabularyRegistry::builtin();
    let offers = registry.get_mut(FieldId::Offer);

    assert!(offers.add_synonym("Займ", "финансы").is_ok());
    assert!(offers
        .synonyms()
        .iter()
        .any(|(phrase, value)| phrase == "займ" && value == "Финансы"));

    assert_eq!(
        offers.add_synonym("ипотека", "Недвижимость"),
        Err(VocabularyError::UnknownValue {
            field: FieldId::Offer,
            value: "Недвижимость".to_owned(),
        })
    );
    assert_eq!(
        offers.add_synonym("   ", "Финансы"),
        Err(VocabularyError::EmptyPhrase(FieldId::Offer))
    );
}

#[test]
fn add_anchor_is_lowercased_and_deduplicated() {
    let mut registry = VocabularyRegistry::builtin();
    let offers = registry.get_mut(FieldId::Offer);
    let before = offers.anchors().len();

    assert!(offers.add_anchor("Вертикал").is_ok());
    assert!(offers.add_anchor("вертикал").is_ok());
    assert_eq!(offers.anchors().len(), before.saturating_add(1));
    assert!(offers.mentions_anchor("измени вертикаль на крипто"));
    assert_eq!(
        offers.add_anchor(""),
        Err(VocabularyError::EmptyPhrase(FieldId::Offer))
    );
}

#[test]
fn rk_pattern_only_accepts_known_tiers() {
    let registry = VocabularyRegistry::builtin();
    let rk = registry.get(FieldId::Rk);
    assert_eq!(rk.pattern_values("рк-003 и рк-010"), ["РК-003", "РК-010"]);
    assert!(rk.pattern_values("рк-999").is_empty());
}
