//! Missing-field report over a batch of drafts.

use crate::campaign::CampaignDraft;
use crate::vocabulary::FieldId;

/// Header line of a non-empty report.
pub const REPORT_HEADER: &str = "Нужно уточнить:";

/// Required fields unset across a batch of drafts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingFields {
    /// Fields unset in every draft.
    pub universal: Vec<FieldId>,
    /// Fields unset in some drafts, with the 1-based indices of those drafts.
    pub partial: Vec<(FieldId, Vec<usize>)>,
}

impl MissingFields {
    /// True when no required field is unset anywhere.
    pub fn is_empty(&self) -> bool {
        self.universal.is_empty() && self.partial.is_empty()
    }
}

/// Classify unset required fields as universal or partial.
///
/// Fields keep the order of `required`.
pub fn analyze(drafts: &[CampaignDraft], required: &[FieldId]) -> MissingFields {
    let mut summary = MissingFields::default();
    if drafts.is_empty() {
        return summary;
    }

    for field in required {
        let rows: Vec<usize> = (1_usize..)
            .zip(drafts)
            .filter(|(_, draft)| draft.get(*field).is_none())
            .map(|(row, _)| row)
            .collect();

        if rows.is_empty() {
            continue;
        }
        if rows.len() == drafts.len() {
            summary.universal.push(*field);
        } else {
            summary.partial.push((*field, rows));
        }
    }

    summary
}

/// Render the missing-field report; empty when nothing is missing.
///
/// ```text
/// Нужно уточнить:
/// • Для всех кампаний: оффер, страну
/// • РК в строках: 2, 3
/// ```
pub fn report(drafts: &[CampaignDraft], required: &[FieldId]) -> String {
    render(&analyze(drafts, required))
}

/// Render an already computed [`MissingFields`].
pub fn render(missing: &MissingFields) -> String {
    if missing.is_empty() {
        return String::new();
    }

    let mut lines = vec![REPORT_HEADER.to_owned()];
    if !missing.universal.is_empty() {
        let fields: Vec<&str> = missing
            .universal
            .iter()
            .map(|field| field.label_accusative())
            .collect();
        lines.push(format!("• Для всех кампаний: {}", fields.join(", ")));
    }
    for (field, rows) in &missing.partial {
        let rows: Vec<String> = rows.iter().map(ToString::to_string).collect();
        lines.push(format!(
            "• {} в строках: {}",
            field.label_accusative(),
            rows.join(", ")
        ));
    }
    lines.join("\n")
}
