//! LLM-backed interpreter.
//!
//! The model receives every vocabulary plus a three-action JSON contract
//! (`create`, `bulk_update`, `error`). Replies are validated against the
//! vocabularies; anything outside the contract is an error so the caller
//! can fall back to local interpretation.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::campaign::{BulkUpdateCommand, CampaignDraft, InterpretationResult};
use crate::combinations::DraftPolicy;
use crate::config::RemoteConfig;
use crate::credentials::Credentials;
use crate::missing;
use crate::providers::router::resolve_provider;
use crate::providers::{CompletionRequest, LlmProvider, Message};
use crate::vocabulary::{FieldId, VocabularyRegistry};

use super::{InterpretError, InterpretRequest, Interpreter};

/// Error reason used when the model itself reports it could not understand.
pub const REASON_REMOTE: &str = "remote";

/// Structured reply expected from the model.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum RemoteReply {
    Create {
        campaigns: Vec<CampaignDraft>,
        message: String,
    },
    BulkUpdate {
        field: String,
        value: String,
        message: String,
    },
    Error {
        message: String,
    },
}

/// Interpreter delegating to an LLM provider.
pub struct RemoteInterpreter {
    provider: Arc<dyn LlmProvider>,
    registry: Arc<VocabularyRegistry>,
    policy: DraftPolicy,
    system_prompt: String,
    max_tokens: u32,
    temperature: f32,
}

impl RemoteInterpreter {
    /// Create an interpreter around an existing provider.
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        registry: Arc<VocabularyRegistry>,
        policy: DraftPolicy,
        settings: &RemoteConfig,
    ) -> Self {
        let system_prompt = build_system_prompt(&registry);
        Self {
            provider,
            registry,
            policy,
            system_prompt,
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }

    /// Resolve the provider from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InterpretError::NotConfigured`] when the model spec is
    /// invalid or its credential is missing. No request is made.
    pub fn from_config(
        settings: &RemoteConfig,
        credentials: &Credentials,
        registry: Arc<VocabularyRegistry>,
        policy: DraftPolicy,
    ) -> Result<Self, InterpretError> {
        let provider = resolve_provider(settings, credentials)
            .map_err(|e| InterpretError::NotConfigured(e.to_string()))?;
        Ok(Self::new(provider, registry, policy, settings))
    }

    /// The system prompt sent with every request.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

#[async_trait]
impl Interpreter for RemoteInterpreter {
    async fn interpret(
        &self,
        request: &InterpretRequest,
    ) -> Result<InterpretationResult, InterpretError> {
        let completion = CompletionRequest {
            messages: vec![Message::user(request.text.clone())],
            system: Some(self.system_prompt.clone()),
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
            json_output: true,
        };

        let response = self.provider.complete(completion).await?;
        debug!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "remote completion received"
        );

        parse_reply(&response.text, &self.registry, &self.policy)
    }

    fn name(&self) -> &str {
        self.provider.model_id()
    }
}

/// Build the system prompt enumerating vocabularies and the reply contract.
pub fn build_system_prompt(registry: &VocabularyRegistry) -> String {
    let mut prompt = String::from(
        "Ты - эксперт по анализу команд для создания рекламных кампаний.\n\nДоступные параметры:\n",
    );
    for vocabulary in registry.iter() {
        prompt.push_str(&format!(
            "- {} (`{}`): {}\n",
            vocabulary.field().label(),
            vocabulary.field().key(),
            vocabulary.canonical_values().join(", ")
        ));
    }

    let synonyms: Vec<String> = registry
        .iter()
        .flat_map(|vocabulary| vocabulary.synonyms().iter())
        .map(|(phrase, value)| format!("{phrase}={value}"))
        .collect();
    if !synonyms.is_empty() {
        prompt.push_str(&format!("\nСинонимы: {}.\n", synonyms.join(", ")));
    }

    let keys: Vec<&str> = FieldId::ALL.iter().map(|field| field.key()).collect();
    prompt.push_str(&format!(
        r#"
Распознай одно действие: создание новых кампаний (все комбинации указанных параметров) или массовое изменение существующих кампаний.

Для создания кампаний верни:
{{"action": "create", "campaigns": [{{"trafficAccount": "...", "offer": "...", "country": "..."}}], "message": "Создано X кампаний"}}
Неуказанные поля опусти или передай null.

Для массового изменения верни:
{{"action": "bulk_update", "field": "{fields}", "value": "новое значение", "message": "Изменил ... на ..."}}

Если команда непонятна:
{{"action": "error", "message": "Не удалось понять команду. Укажите ..."}}

Используй только значения из списков выше. Отвечай ТОЛЬКО валидным JSON."#,
        fields = keys.join("|")
    ));
    prompt
}

/// Parse and validate a model reply against the result contract.
///
/// Created drafts get configured defaults for unset fields, and the local
/// missing-field report is appended to the model's message.
///
/// # Errors
///
/// Returns [`InterpretError::Malformed`] for invalid JSON, an unknown
/// `action`, missing or blank fields, an empty campaign list, or any value
/// outside the vocabularies.
pub fn parse_reply(
    text: &str,
    registry: &VocabularyRegistry,
    policy: &DraftPolicy,
) -> Result<InterpretationResult, InterpretError> {
    let reply: RemoteReply = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| InterpretError::Malformed(e.to_string()))?;

    match reply {
        RemoteReply::Create { campaigns, message } => {
            let message = require_message(message)?;
            if campaigns.is_empty() {
                return Err(InterpretError::Malformed(
                    "create reply without campaigns".to_owned(),
                ));
            }
            let mut drafts = Vec::with_capacity(campaigns.len());
            for campaign in campaigns {
                let mut draft = canonical_draft(campaign, registry)?;
                policy.apply_defaults(&mut draft);
                drafts.push(draft);
            }
            let report = missing::report(&drafts, policy.required());
            let message = if report.is_empty() {
                message
            } else {
                format!("{message}\n\n{report}")
            };
            Ok(InterpretationResult::Create { drafts, message })
        }
        RemoteReply::BulkUpdate {
            field,
            value,
            message,
        } => {
            let message = require_message(message)?;
            let field: FieldId = field
                .parse()
                .map_err(|e: crate::vocabulary::VocabularyError| {
                    InterpretError::Malformed(e.to_string())
                })?;
            let value = registry
                .canonicalize(field, &value)
                .map_err(|e| InterpretError::Malformed(e.to_string()))?;
            Ok(InterpretationResult::BulkUpdate {
                command: BulkUpdateCommand { field, value },
                message,
            })
        }
        RemoteReply::Error { message } => Ok(InterpretationResult::Error {
            reason: REASON_REMOTE.to_owned(),
            message: require_message(message)?,
        }),
    }
}

fn require_message(message: String) -> Result<String, InterpretError> {
    if message.trim().is_empty() {
        return Err(InterpretError::Malformed("blank message".to_owned()));
    }
    Ok(message)
}

/// Normalise every set field to its canonical spelling.
fn canonical_draft(
    draft: CampaignDraft,
    registry: &VocabularyRegistry,
) -> Result<CampaignDraft, InterpretError> {
    let mut checked = CampaignDraft::default();
    for field in FieldId::ALL {
        let value = match draft.get(field).map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                registry
                    .canonicalize(field, raw)
                    .map_err(|e| InterpretError::Malformed(e.to_string()))?,
            ),
            _ => None,
        };
        checked.set(field, value);
    }
    Ok(checked)
}

/// Accept replies wrapped in a Markdown code fence.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.strip_suffix("```").unwrap_or(rest);
    match body.split_once('\n') {
        Some((lang, json)) if !lang.trim_start().starts_with('{') => json.trim(),
        _ => body.trim(),
    }
}
