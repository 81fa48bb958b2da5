//! Tests for provider types and utility functions.

use kampania::providers::{parse_provider_string, Message, Role, UsageStats};

#[test]
fn parse_provider_string_valid() {
    let (provider, model) = parse_provider_string("openai/gpt-4o-mini").expect("should parse");
    assert_eq!(provider, "openai");
    assert_eq!(model, "gpt-4o-mini");
}

#[test]
fn parse_provider_string_keeps_extra_slashes_in_model() {
    let (provider, model) =
        parse_provider_string("openai/org/custom-model").expect("should parse");
    assert_eq!(provider, "openai");
    assert_eq!(model, "org/custom-model");
}

#[test]
fn parse_provider_string_rejects_incomplete_specs() {
    assert!(parse_provider_string("no-slash").is_err());
    assert!(parse_provider_string("/model").is_err());
    assert!(parse_provider_string("provider/").is_err());
}

#[test]
fn user_message_constructor() {
    let msg = Message::user("привет");
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.content, "привет");
}

#[test]
fn role_serializes_lowercase() {
    let json = serde_json::to_string(&Role::Assistant).expect("should serialize");
    assert_eq!(json, "\"assistant\"");
}

#[test]
fn usage_defaults_to_zero() {
    assert_eq!(
        UsageStats::default(),
        UsageStats {
            input_tokens: 0,
            output_tokens: 0,
        }
    );
}
