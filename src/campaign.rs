//! Campaign drafts, bulk-update commands, and the interpretation result
//! contract shared by every interpreter.

use serde::{Deserialize, Serialize};

use crate::vocabulary::FieldId;

/// A partial campaign record produced by interpretation.
///
/// `None` marks an unset field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDraft {
    /// Traffic source account.
    pub traffic_account: Option<String>,
    /// Offer vertical.
    pub offer: Option<String>,
    /// Target country.
    pub country: Option<String>,
    /// Campaign tier identifier.
    pub rk: Option<String>,
    /// Tracking pixel.
    pub pixel: Option<String>,
}

impl CampaignDraft {
    /// Value of a field, if set.
    pub fn get(&self, field: FieldId) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Overwrite a field.
    pub fn set(&mut self, field: FieldId, value: Option<String>) {
        *self.slot_mut(field) = value;
    }

    /// Required fields that are unset, in the order given.
    pub fn missing(&self, required: &[FieldId]) -> Vec<FieldId> {
        required
            .iter()
            .copied()
            .filter(|field| self.get(*field).is_none())
            .collect()
    }

    /// Short `account - offer - country` line for confirmation messages.
    pub fn summary(&self) -> String {
        [FieldId::TrafficAccount, FieldId::Offer, FieldId::Country]
            .into_iter()
            .map(|field| self.get(field).unwrap_or("?"))
            .collect::<Vec<_>>()
            .join(" - ")
    }

    fn slot(&self, field: FieldId) -> &Option<String> {
        match field {
            FieldId::TrafficAccount => &self.traffic_account,
            FieldId::Offer => &self.offer,
            FieldId::Country => &self.country,
            FieldId::Rk => &self.rk,
            FieldId::Pixel => &self.pixel,
        }
    }

    fn slot_mut(&mut self, field: FieldId) -> &mut Option<String> {
        match field {
            FieldId::TrafficAccount => &mut self.traffic_account,
            FieldId::Offer => &mut self.offer,
            FieldId::Country => &mut self.country,
            FieldId::Rk => &mut self.rk,
            FieldId::Pixel => &mut self.pixel,
        }
    }
}

/// Overwrite one field across every existing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUpdateCommand {
    /// Field to overwrite.
    pub field: FieldId,
    /// Canonical value for the field.
    pub value: String,
}

/// Outcome of interpreting one operator message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum InterpretationResult {
    /// New campaign drafts to create.
    Create {
        /// Drafts in cartesian order.
        drafts: Vec<CampaignDraft>,
        /// Operator-facing confirmation.
        message: String,
    },
    /// Mass overwrite of one field.
    BulkUpdate {
        /// The field/value pair to apply.
        command: BulkUpdateCommand,
        /// Operator-facing confirmation.
        message: String,
    },
    /// The message could not be interpreted.
    Error {
        /// Machine-readable reason.
        reason: String,
        /// Operator-facing guidance.
        message: String,
    },
}

impl InterpretationResult {
    /// The operator-facing message carried by every variant.
    pub fn message(&self) -> &str {
        match self {
            Self::Create { message, .. }
            | Self::BulkUpdate { message, .. }
            | Self::Error { message, .. } => message,
        }
    }

    /// Variant tag as serialized.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Create { .. } => "create",
            Self::BulkUpdate { .. } => "bulkUpdate",
            Self::Error { .. } => "error",
        }
    }
}

/// Pick the Russian noun form agreeing with `n` (`one`, `few`, `many`).
///
/// `plural_ru(1, "кампания", "кампании", "кампаний")` → `"кампания"`,
/// `2` → `"кампании"`, `5` and `11` → `"кампаний"`.
pub fn plural_ru<'a>(n: usize, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    let tens = n % 100;
    if (11..=14).contains(&tens) {
        return many;
    }
    match n % 10 {
        1 => one,
        2..=4 => few,
        _ => many,
    }
}
