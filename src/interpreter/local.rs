//! Deterministic keyword interpreter.
//!
//! Order per message: bulk-update recognizer first (exclusive when it
//! matches), then extraction, cartesian expansion, and the missing-field
//! report.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::bulk_update::{recognize_bulk_update, BulkUpdateRules};
use crate::campaign::{plural_ru, BulkUpdateCommand, CampaignDraft, InterpretationResult};
use crate::combinations::{expand, DraftPolicy};
use crate::extractor::extract;
use crate::missing;
use crate::vocabulary::{FieldId, VocabularyRegistry};

use super::{InterpretError, InterpretRequest, Interpreter};

/// Error reason used when nothing in the message was recognised.
pub const REASON_UNRECOGNIZED: &str = "unrecognized";

/// Fields with at most this many values list them in the guidance message.
const MAX_INLINE_CHOICES: usize = 4;

/// Keyword-based interpreter over the vocabulary registry.
#[derive(Debug, Clone)]
pub struct LocalInterpreter {
    registry: Arc<VocabularyRegistry>,
    policy: DraftPolicy,
    rules: BulkUpdateRules,
}

impl LocalInterpreter {
    /// Create an interpreter.
    pub fn new(
        registry: Arc<VocabularyRegistry>,
        policy: DraftPolicy,
        rules: BulkUpdateRules,
    ) -> Self {
        Self {
            registry,
            policy,
            rules,
        }
    }

    /// Interpreter over built-in vocabularies and default policy.
    pub fn builtin() -> Self {
        Self::new(
            Arc::new(VocabularyRegistry::builtin()),
            DraftPolicy::default(),
            BulkUpdateRules::default(),
        )
    }

    /// The vocabularies in use.
    pub fn registry(&self) -> &VocabularyRegistry {
        &self.registry
    }

    /// The draft policy in use.
    pub fn policy(&self) -> &DraftPolicy {
        &self.policy
    }

    /// Interpret a message. Infallible.
    pub fn interpret_message(&self, request: &InterpretRequest) -> InterpretationResult {
        if let Some(command) = recognize_bulk_update(&request.text, &self.registry, &self.rules) {
            let message = bulk_update_message(&command, request.existing_records);
            return InterpretationResult::BulkUpdate { command, message };
        }

        let matches = extract(&request.text, &self.registry);
        if matches.is_empty() {
            debug!("no field recognised in message");
            return InterpretationResult::Error {
                reason: REASON_UNRECOGNIZED.to_owned(),
                message: self.guidance_message(),
            };
        }

        let drafts = expand(&matches, &self.policy);
        let message = created_message(&drafts, self.policy.required());
        InterpretationResult::Create { drafts, message }
    }

    /// "Could not understand" message naming the fields to mention.
    pub fn guidance_message(&self) -> String {
        let fields: Vec<FieldId> = if self.policy.required().is_empty() {
            FieldId::ALL.to_vec()
        } else {
            self.policy.required().to_vec()
        };
        let hints: Vec<String> = fields
            .into_iter()
            .map(|field| {
                let values = self.registry.get(field).canonical_values();
                if values.len() <= MAX_INLINE_CHOICES {
                    format!("{} ({})", field.label_accusative(), values.join("/"))
                } else {
                    field.label_accusative().to_owned()
                }
            })
            .collect();
        format!(
            "Не удалось понять запрос. Попробуйте указать: {}.",
            hints.join(", ")
        )
    }
}

#[async_trait]
impl Interpreter for LocalInterpreter {
    async fn interpret(
        &self,
        request: &InterpretRequest,
    ) -> Result<InterpretationResult, InterpretError> {
        Ok(self.interpret_message(request))
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// Confirmation for created drafts, followed by the missing-field report.
pub fn created_message(drafts: &[CampaignDraft], required: &[FieldId]) -> String {
    let count = drafts.len();
    let verb = plural_ru(count, "Создана", "Создано", "Создано");
    let noun = plural_ru(count, "кампания", "кампании", "кампаний");
    let mut message = format!("{verb} {count} {noun}.");

    let report = missing::report(drafts, required);
    if !report.is_empty() {
        message.push_str("\n\n");
        message.push_str(&report);
    }
    message
}

/// Confirmation for a bulk update over `records` existing records.
pub fn bulk_update_message(command: &BulkUpdateCommand, records: usize) -> String {
    format!(
        "Изменил {} на \"{}\" для {records} {}",
        command.field.label_accusative(),
        command.value,
        plural_ru(records, "кампании", "кампаний", "кампаний")
    )
}
