//! Provider resolution from remote settings and credentials.

use std::collections::BTreeMap;

use kampania::config::RemoteConfig;
use kampania::credentials::Credentials;
use kampania::providers::router::{default_credential_key, resolve_provider, RouterError};

fn credentials(pairs: &[(&str, &str)]) -> Credentials {
    let vars: BTreeMap<String, String> = pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect();
    Credentials::from_map(vars)
}

fn remote(model: &str) -> RemoteConfig {
    RemoteConfig {
        model: model.to_owned(),
        ..RemoteConfig::default()
    }
}

#[test]
fn default_keys_per_provider() {
    assert_eq!(default_credential_key("openai"), Some("OPENAI_API_KEY"));
    assert_eq!(default_credential_key("anthropic"), Some("ANTHROPIC_API_KEY"));
    assert_eq!(default_credential_key("ollama"), None);
}

#[test]
fn resolves_openai_with_default_key() {
    let provider = resolve_provider(
        &remote("openai/gpt-4o-mini"),
        &credentials(&[("OPENAI_API_KEY", "sk-test")]),
    )
    .expect("provider should resolve");
    assert_eq!(provider.model_id(), "openai/gpt-4o-mini");
}

#[test]
fn resolves_anthropic_with_custom_key_name() {
    let settings = RemoteConfig {
        api_key_env: Some("CAMPAIGN_LLM_KEY".to_owned()),
        base_url: Some("http://127.0.0.1:9/v1/messages".to_owned()),
        ..remote("anthropic/claude-haiku-4-5")
    };
    let provider = resolve_provider(&settings, &credentials(&[("CAMPAIGN_LLM_KEY", "key")]))
        .expect("provider should resolve");
    assert_eq!(provider.model_id(), "anthropic/claude-haiku-4-5");
}

#[test]
fn missing_credential_is_reported() {
    let result = resolve_provider(
        &remote("anthropic/claude-haiku-4-5"),
        &credentials(&[("OPENAI_API_KEY", "sk-test"), ("ANTHROPIC_API_KEY", "  ")]),
    );
    match result {
        Err(RouterError::MissingCredential { provider, key }) => {
            assert_eq!(provider, "anthropic");
            assert_eq!(key, "ANTHROPIC_API_KEY");
        }
        Err(other) => panic!("expected missing credential, got: {other}"),
        Ok(_) => panic!("expected missing credential"),
    }
}

#[test]
fn invalid_and_unsupported_specs() {
    let creds = credentials(&[("OPENAI_API_KEY", "sk-test")]);
    assert!(matches!(
        resolve_provider(&remote("gpt-4o-mini"), &creds),
        Err(RouterError::InvalidModelSpec { .. })
    ));
    assert!(matches!(
        resolve_provider(&remote("ollama/qwen3:8b"), &creds),
        Err(RouterError::UnsupportedProvider { .. })
    ));
}
