//! Deterministic local interpretation.

use kampania::campaign::{BulkUpdateCommand, CampaignDraft, InterpretationResult};
use kampania::interpreter::local::{
    bulk_update_message, created_message, LocalInterpreter, REASON_UNRECOGNIZED,
};
use kampania::interpreter::{InterpretRequest, Interpreter};
use kampania::vocabulary::FieldId;

fn interpret(text: &str) -> InterpretationResult {
    LocalInterpreter::builtin().interpret_message(&InterpretRequest::new(text, 0))
}

#[test]
fn single_complete_campaign() {
    let result = interpret("создай кампанию для Меты с оффером Финансы для России");

    let InterpretationResult::Create { drafts, message } = result else {
        panic!("expected create result");
    };
    assert_eq!(
        drafts,
        vec![CampaignDraft {
            traffic_account: Some("Мета".to_owned()),
            offer: Some("Финансы".to_owned()),
            country: Some("Россия".to_owned()),
            rk: Some("РК-001".to_owned()),
            pixel: Some("Facebook Pixel".to_owned()),
        }]
    );
    assert_eq!(message, "Создана 1 кампания.");
    assert!(!message.contains("Нужно уточнить"));
}

#[test]
fn traffic_only_reports_missing_offer_and_country() {
    let result = interpret("создай кампанию для ТикТок");

    let InterpretationResult::Create { drafts, message } = result else {
        panic!("expected create result");
    };
    assert_eq!(drafts.len(), 1);
    assert_eq!(
        message,
        "Создана 1 кампания.\n\nНужно уточнить:\n• Для всех кампаний: оффер, страну"
    );
}

#[test]
fn combinations_are_counted_in_message() {
    let result = interpret("Мета, офферы Крипто и Нутра, страны Германия, Франция, Польша");

    let InterpretationResult::Create { drafts, message } = result else {
        panic!("expected create result");
    };
    assert_eq!(drafts.len(), 6);
    assert_eq!(message, "Создано 6 кампаний.");
}

#[test]
fn bulk_update_takes_precedence_over_extraction() {
    let interpreter = LocalInterpreter::builtin();
    let result = interpreter.interpret_message(&InterpretRequest::new("измени РК на РК-005", 3));

    assert_eq!(
        result,
        InterpretationResult::BulkUpdate {
            command: BulkUpdateCommand {
                field: FieldId::Rk,
                value: "РК-005".to_owned(),
            },
            message: "Изменил РК на \"РК-005\" для 3 кампаний".to_owned(),
        }
    );
}

#[test]
fn unrecognized_message_asks_for_required_fields() {
    let result = interpret("привет");

    let InterpretationResult::Error { reason, message } = result else {
        panic!("expected error result");
    };
    assert_eq!(reason, REASON_UNRECOGNIZED);
    assert_eq!(
        message,
        "Не удалось понять запрос. Попробуйте указать: тоник аккаунт (Мета/ТикТок), оффер, страну."
    );
}

#[test]
fn created_message_agrees_in_number() {
    let drafts = vec![CampaignDraft::default(); 2];
    assert!(created_message(&drafts, &[]).starts_with("Создано 2 кампании."));

    let drafts = vec![CampaignDraft::default(); 21];
    assert_eq!(created_message(&drafts, &[]), "Создана 21 кампания.");
}

#[test]
fn bulk_update_message_agrees_in_number() {
    let command = BulkUpdateCommand {
        field: FieldId::Country,
        value: "США".to_owned(),
    };
    assert_eq!(
        bulk_update_message(&command, 1),
        "Изменил страну на \"США\" для 1 кампании"
    );
    assert_eq!(
        bulk_update_message(&command, 0),
        "Изменил страну на \"США\" для 0 кампаний"
    );
}

#[tokio::test]
async fn trait_call_matches_direct_call() {
    let interpreter = LocalInterpreter::builtin();
    let request = InterpretRequest::new("оффер Софт в Канаде", 0);

    let via_trait = interpreter.interpret(&request).await;
    assert!(via_trait.is_ok());
    let via_trait = match via_trait {
        Ok(result) => result,
        Err(err) => panic!("local interpreter never fails: {err}"),
    };
    assert_eq!(via_trait, interpreter.interpret_message(&request));
    assert_eq!(interpreter.name(), "local");
}

#[test]
fn result_serializes_with_kind_tag() {
    let result = interpret("измени РК на РК-005");
    let json = serde_json::to_value(&result).expect("result should serialize");

    assert_eq!(json["kind"], "bulkUpdate");
    assert_eq!(json["command"]["field"], "rk");
    assert_eq!(json["command"]["value"], "РК-005");
}
