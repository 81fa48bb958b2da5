//! OpenAI provider wire format tests.

use kampania::providers::openai::{build_request, parse_response};
use kampania::providers::{CompletionRequest, Message, ProviderError, Role};
use serde_json::json;

fn simple_request() -> CompletionRequest {
    CompletionRequest {
        messages: vec![Message::user("создай кампанию")],
        system: Some("Отвечай JSON.".to_owned()),
        max_tokens: Some(256),
        temperature: Some(0.1),
        json_output: true,
    }
}

#[test]
fn build_request_puts_system_first() {
    let req = build_request("gpt-4o-mini", &simple_request());
    assert_eq!(req.model, "gpt-4o-mini");
    assert_eq!(req.max_tokens, 256);
    assert_eq!(req.temperature, Some(0.1));
    assert_eq!(req.messages.len(), 2);
    assert_eq!(req.messages[0].role, "system");
    assert_eq!(req.messages[0].content, Some("Отвечай JSON.".to_owned()));
    assert_eq!(req.messages[1].role, "user");
    assert_eq!(req.messages[1].content, Some("создай кампанию".to_owned()));
}

#[test]
fn build_request_enables_json_mode_on_request() {
    let req = build_request("gpt-4o-mini", &simple_request());
    assert_eq!(req.response_format, Some(json!({"type": "json_object"})));

    let plain = CompletionRequest {
        messages: vec![Message {
            role: Role::Assistant,
            content: "ok".to_owned(),
        }],
        system: None,
        max_tokens: None,
        temperature: None,
        json_output: false,
    };
    let req = build_request("gpt-4o-mini", &plain);
    assert_eq!(req.response_format, None);
    assert_eq!(req.max_tokens, 1000);
    assert_eq!(req.messages.len(), 1);
    assert_eq!(req.messages[0].role, "assistant");

    let body = serde_json::to_value(&req).expect("request should serialize");
    assert!(body.get("response_format").is_none());
    assert!(body.get("temperature").is_none());
}

#[test]
fn parse_response_extracts_text_and_usage() {
    let body = json!({
        "model": "gpt-4o-mini-2024-07-18",
        "choices": [{"message": {"role": "assistant", "content": "{\"action\":\"error\"}"}}],
        "usage": {"prompt_tokens": 12, "completion_tokens": 5}
    })
    .to_string();

    let resp = parse_response(&body).expect("should parse");
    assert_eq!(resp.text, "{\"action\":\"error\"}");
    assert_eq!(resp.model, "gpt-4o-mini-2024-07-18");
    assert_eq!(resp.usage.input_tokens, 12);
    assert_eq!(resp.usage.output_tokens, 5);
}

#[test]
fn parse_response_without_usage_defaults_to_zero() {
    let body = json!({
        "model": "gpt-4o-mini",
        "choices": [{"message": {"role": "assistant", "content": "{}"}}]
    })
    .to_string();

    let resp = parse_response(&body).expect("should parse");
    assert_eq!(resp.usage.input_tokens, 0);
    assert_eq!(resp.usage.output_tokens, 0);
}

#[test]
fn parse_response_rejects_empty_choices_and_content() {
    let no_choices = json!({"model": "gpt-4o-mini", "choices": []}).to_string();
    assert!(matches!(
        parse_response(&no_choices),
        Err(ProviderError::Parse(_))
    ));

    let refusal = json!({
        "model": "gpt-4o-mini",
        "choices": [{"message": {"role": "assistant", "content": null}}]
    })
    .to_string();
    assert!(matches!(parse_response(&refusal), Err(ProviderError::Parse(_))));

    assert!(matches!(
        parse_response("not json"),
        Err(ProviderError::Parse(_))
    ));
}
