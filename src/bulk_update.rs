//! Recognizer for "change every record" commands such as `измени РК на РК-005`.
//!
//! Runs before entity extraction: when it returns a command, no drafts are
//! created for the message.

use tracing::debug;

use crate::campaign::BulkUpdateCommand;
use crate::vocabulary::{FieldVocabulary, VocabularyRegistry};

/// Phrases that mark a bulk-update command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkUpdateRules {
    trigger: String,
    connectives: Vec<String>,
}

impl Default for BulkUpdateRules {
    fn default() -> Self {
        Self::new("измени", &["на", "to"])
    }
}

impl BulkUpdateRules {
    /// Build rules from a trigger phrase and connective words (all lowercased).
    pub fn new(trigger: &str, connectives: &[&str]) -> Self {
        Self {
            trigger: trigger.trim().to_lowercase(),
            connectives: connectives
                .iter()
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty())
                .collect(),
        }
    }

    /// The trigger phrase.
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    /// Connective words ("на", "to").
    pub fn connectives(&self) -> &[String] {
        &self.connectives
    }

    /// Whether lowercased text contains the trigger phrase.
    pub fn is_triggered(&self, lower: &str) -> bool {
        !self.trigger.is_empty() && lower.contains(self.trigger.as_str())
    }

    /// Lowercased text following the earliest connective word, if any.
    ///
    /// Connectives match whole words only, so `на` inside `финансы` or `to`
    /// inside `tiktok` does not count.
    pub fn text_after_connective<'a>(&self, lower: &'a str) -> Option<&'a str> {
        self.connectives
            .iter()
            .filter_map(|connective| find_word_end(lower, connective))
            .min()
            .and_then(|end| lower.get(end..))
    }
}

/// Recognize a bulk-update command.
///
/// Returns `None` unless the trigger phrase, a connective word, and a field
/// anchor all occur. The new value is read from the text after the first
/// connective, so an old value named before it never wins. Fields are tried
/// in canonical order and the first one whose value resolves wins, so
/// several anchors in one message never make the result ambiguous.
pub fn recognize_bulk_update(
    text: &str,
    registry: &VocabularyRegistry,
    rules: &BulkUpdateRules,
) -> Option<BulkUpdateCommand> {
    let lower = text.to_lowercase();
    if !rules.is_triggered(&lower) {
        return None;
    }
    let Some(tail) = rules.text_after_connective(&lower) else {
        debug!("bulk-update trigger without connective");
        return None;
    };

    for vocabulary in registry.iter() {
        if !vocabulary.mentions_anchor(&lower) {
            continue;
        }
        if let Some(value) = resolve_value(vocabulary, tail) {
            debug!(field = %vocabulary.field(), %value, "bulk-update recognized");
            return Some(BulkUpdateCommand {
                field: vocabulary.field(),
                value,
            });
        }
    }

    debug!("bulk-update trigger without a resolvable field");
    None
}

/// Single value for a bulk update: accepted pattern hit, then canonical
/// spelling, then synonym.
fn resolve_value(vocabulary: &FieldVocabulary, lower: &str) -> Option<String> {
    vocabulary
        .pattern_values(lower)
        .into_iter()
        .chain(vocabulary.canonical_hits(lower))
        .chain(vocabulary.synonym_hits(lower))
        .next()
        .map(str::to_owned)
}

/// Byte offset just past the first occurrence of `word` that is not part of
/// a longer word.
fn find_word_end(haystack: &str, word: &str) -> Option<usize> {
    haystack.match_indices(word).find_map(|(start, _)| {
        let end = start.saturating_add(word.len());
        let before = haystack.get(..start)?.chars().next_back();
        let after = haystack.get(end..)?.chars().next();
        let bounded = |c: Option<char>| !c.is_some_and(char::is_alphanumeric);
        (bounded(before) && bounded(after)).then_some(end)
    })
}
