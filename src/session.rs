//! In-memory campaign records for an interactive session.
//!
//! Interpreters never mutate records; the session applies their results.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::campaign::{CampaignDraft, InterpretationResult};

/// A created campaign record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    /// Record identifier.
    pub id: Uuid,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Field values.
    #[serde(flatten)]
    pub draft: CampaignDraft,
}

impl Campaign {
    /// Wrap a draft into a new record.
    pub fn new(draft: CampaignDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            draft,
        }
    }
}

/// Ordered list of records created so far.
#[derive(Debug, Clone, Default)]
pub struct Session {
    records: Vec<Campaign>,
}

impl Session {
    /// Empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an interpretation result and return the number of records
    /// created or updated.
    ///
    /// Create results append one record per draft; bulk updates overwrite
    /// the field on every record; errors change nothing.
    pub fn apply(&mut self, result: &InterpretationResult) -> usize {
        match result {
            InterpretationResult::Create { drafts, .. } => {
                self.records
                    .extend(drafts.iter().cloned().map(Campaign::new));
                debug!(created = drafts.len(), total = self.records.len(), "records created");
                drafts.len()
            }
            InterpretationResult::BulkUpdate { command, .. } => {
                for record in &mut self.records {
                    record.draft.set(command.field, Some(command.value.clone()));
                }
                debug!(field = %command.field, updated = self.records.len(), "records updated");
                self.records.len()
            }
            InterpretationResult::Error { .. } => 0,
        }
    }

    /// Records in creation order.
    pub fn records(&self) -> &[Campaign] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record exists yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
