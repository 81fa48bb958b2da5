//! Field vocabularies: canonical values, trigger phrases, and extraction
//! strategies for every editable campaign attribute.
//!
//! All field names and value tables live here. Other modules refer to fields
//! only through [`FieldId`] and look values up through [`VocabularyRegistry`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Literal pattern for tier identifiers such as `РК-005` (matched on lowercased text).
const RK_PATTERN: &str = r"рк-\d{3}\b";

static RK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(RK_PATTERN).expect("RK_PATTERN is a valid regex"));

// ---------------------------------------------------------------------------
// Field identifiers
// ---------------------------------------------------------------------------

/// Editable campaign attribute.
///
/// Declaration order is the canonical field order: it drives the cartesian
/// product layout and the bulk-update precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    /// Traffic source account (`Мета`, `ТикТок`).
    TrafficAccount,
    /// Offer vertical.
    Offer,
    /// Target country.
    Country,
    /// Campaign tier identifier (`РК-NNN`).
    Rk,
    /// Tracking pixel.
    Pixel,
}

impl FieldId {
    /// Number of fields.
    pub const COUNT: usize = 5;

    /// All fields in canonical order.
    pub const ALL: [FieldId; Self::COUNT] = [
        Self::TrafficAccount,
        Self::Offer,
        Self::Country,
        Self::Rk,
        Self::Pixel,
    ];

    /// Stable wire key used in JSON and configuration.
    pub fn key(self) -> &'static str {
        match self {
            Self::TrafficAccount => "trafficAccount",
            Self::Offer => "offer",
            Self::Country => "country",
            Self::Rk => "rk",
            Self::Pixel => "pixel",
        }
    }

    /// Column label shown to operators.
    pub fn label(self) -> &'static str {
        match self {
            Self::TrafficAccount => "Трафик аккаунт",
            Self::Offer => "Оффер",
            Self::Country => "Страна",
            Self::Rk => "РК",
            Self::Pixel => "Пиксель",
        }
    }

    /// Label in the accusative case, as used in "укажите ..." / "изменил ... на".
    pub fn label_accusative(self) -> &'static str {
        match self {
            Self::TrafficAccount => "тоник аккаунт",
            Self::Offer => "оффер",
            Self::Country => "страну",
            Self::Rk => "РК",
            Self::Pixel => "пиксель",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::TrafficAccount => 0,
            Self::Offer => 1,
            Self::Country => 2,
            Self::Rk => 3,
            Self::Pixel => 4,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FieldId {
    type Err = VocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| VocabularyError::UnknownField(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while editing or querying vocabularies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VocabularyError {
    /// The key does not name any campaign field.
    #[error("unknown campaign field '{0}'")]
    UnknownField(String),
    /// The value is not one of the field's canonical values.
    #[error("'{value}' is not a valid value for field '{field}'")]
    UnknownValue {
        /// Field the value was checked against.
        field: FieldId,
        /// Rejected value.
        value: String,
    },
    /// Trigger phrases must contain at least one non-whitespace character.
    #[error("empty trigger phrase for field '{0}'")]
    EmptyPhrase(FieldId),
}

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// How values of a field are recognised in text.
#[derive(Debug, Clone)]
pub enum ExtractionStrategy {
    /// Substring search for canonical values and synonyms.
    Keywords,
    /// A literal pattern run first; hits are accepted only when they name a
    /// canonical value. Keyword search is used when no hit is accepted.
    Pattern(Regex),
}

/// Allowed values and recognised phrases for one campaign field.
#[derive(Debug, Clone)]
pub struct FieldVocabulary {
    field: FieldId,
    canonical: Vec<String>,
    synonyms: Vec<(String, String)>,
    anchors: Vec<String>,
    strategy: ExtractionStrategy,
}

impl FieldVocabulary {
    /// Create a keyword vocabulary with the given canonical values.
    pub fn new(field: FieldId, canonical: &[&str]) -> Self {
        Self {
            field,
            canonical: canonical.iter().map(|v| (*v).to_owned()).collect(),
            synonyms: Vec::new(),
            anchors: Vec::new(),
            strategy: ExtractionStrategy::Keywords,
        }
    }

    /// The field this vocabulary describes.
    pub fn field(&self) -> FieldId {
        self.field
    }

    /// Canonical values in display order.
    pub fn canonical_values(&self) -> &[String] {
        &self.canonical
    }

    /// Explicit `(phrase, canonical value)` synonyms in insertion order.
    pub fn synonyms(&self) -> &[(String, String)] {
        &self.synonyms
    }

    /// Phrases that identify this field in a bulk-update command.
    pub fn anchors(&self) -> &[String] {
        &self.anchors
    }

    /// Active extraction strategy.
    pub fn strategy(&self) -> &ExtractionStrategy {
        &self.strategy
    }

    /// Case-insensitive lookup returning the stored canonical spelling.
    pub fn canonical_for(&self, candidate: &str) -> Option<&str> {
        let needle = candidate.trim().to_lowercase();
        self.canonical
            .iter()
            .find(|value| value.to_lowercase() == needle)
            .map(String::as_str)
    }

    /// Register a synonym for a canonical value.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::UnknownValue`] when `target` is not canonical
    /// and [`VocabularyError::EmptyPhrase`] for a blank phrase.
    pub fn add_synonym(&mut self, phrase: &str, target: &str) -> Result<(), VocabularyError> {
        let phrase = phrase.trim().to_lowercase();
        if phrase.is_empty() {
            return Err(VocabularyError::EmptyPhrase(self.field));
        }
        let canonical = self
            .canonical_for(target)
            .ok_or_else(|| VocabularyError::UnknownValue {
                field: self.field,
                value: target.to_owned(),
            })?
            .to_owned();
        if !self.synonyms.iter().any(|(p, c)| *p == phrase && *c == canonical) {
            self.synonyms.push((phrase, canonical));
        }
        Ok(())
    }

    /// Register an extra bulk-update anchor phrase.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::EmptyPhrase`] for a blank phrase.
    pub fn add_anchor(&mut self, phrase: &str) -> Result<(), VocabularyError> {
        let phrase = phrase.trim().to_lowercase();
        if phrase.is_empty() {
            return Err(VocabularyError::EmptyPhrase(self.field));
        }
        if !self.anchors.contains(&phrase) {
            self.anchors.push(phrase);
        }
        Ok(())
    }

    /// Whether any anchor phrase occurs in already-lowercased text.
    pub fn mentions_anchor(&self, lower: &str) -> bool {
        self.anchors.iter().any(|anchor| lower.contains(anchor.as_str()))
    }

    /// Canonical values named by accepted pattern hits, in order of appearance.
    ///
    /// Always empty for [`ExtractionStrategy::Keywords`].
    pub fn pattern_values(&self, lower: &str) -> Vec<&str> {
        let ExtractionStrategy::Pattern(regex) = &self.strategy else {
            return Vec::new();
        };
        let mut values: Vec<&str> = Vec::new();
        for hit in regex.find_iter(lower) {
            if let Some(value) = self.canonical_for(hit.as_str()) {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }
        values
    }

    /// Canonical values whose own spelling occurs in lowercased text.
    pub fn canonical_hits(&self, lower: &str) -> Vec<&str> {
        self.canonical
            .iter()
            .filter(|value| lower.contains(value.to_lowercase().as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Canonical values implied by synonym phrases occurring in lowercased
    /// text, in synonym order.
    pub fn synonym_hits(&self, lower: &str) -> Vec<&str> {
        let mut values: Vec<&str> = Vec::new();
        for (phrase, value) in &self.synonyms {
            if lower.contains(phrase.as_str()) && !values.contains(&value.as_str()) {
                values.push(value.as_str());
            }
        }
        values
    }

    fn with_synonyms(mut self, target: &str, phrases: &[&str]) -> Self {
        for phrase in phrases {
            self.synonyms
                .push(((*phrase).to_lowercase(), target.to_owned()));
        }
        self
    }

    fn with_anchors(mut self, anchors: &[&str]) -> Self {
        self.anchors
            .extend(anchors.iter().map(|a| (*a).to_lowercase()));
        self
    }

    fn with_pattern(mut self, regex: Regex) -> Self {
        self.strategy = ExtractionStrategy::Pattern(regex);
        self
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// One vocabulary per [`FieldId`], read-only once interpretation starts.
#[derive(Debug, Clone)]
pub struct VocabularyRegistry {
    vocabularies: [FieldVocabulary; FieldId::COUNT],
}

impl Default for VocabularyRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl VocabularyRegistry {
    /// The stock vocabularies of the campaign manager.
    pub fn builtin() -> Self {
        Self {
            vocabularies: [
                traffic_accounts(),
                offers(),
                countries(),
                rk_options(),
                pixels(),
            ],
        }
    }

    /// Vocabulary for a field.
    pub fn get(&self, field: FieldId) -> &FieldVocabulary {
        &self.vocabularies[field.index()]
    }

    /// Mutable vocabulary for a field (used while applying configuration).
    pub fn get_mut(&mut self, field: FieldId) -> &mut FieldVocabulary {
        &mut self.vocabularies[field.index()]
    }

    /// Iterate vocabularies in canonical field order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldVocabulary> {
        self.vocabularies.iter()
    }

    /// Normalise a value for a field to its canonical spelling.
    ///
    /// # Errors
    ///
    /// Returns [`VocabularyError::UnknownValue`] if the value is not canonical.
    pub fn canonicalize(&self, field: FieldId, value: &str) -> Result<String, VocabularyError> {
        self.get(field)
            .canonical_for(value)
            .map(str::to_owned)
            .ok_or_else(|| VocabularyError::UnknownValue {
                field,
                value: value.to_owned(),
            })
    }
}

fn traffic_accounts() -> FieldVocabulary {
    FieldVocabulary::new(FieldId::TrafficAccount, &["Мета", "ТикТок"])
        .with_synonyms(
            "Мета",
            &["меты", "мете", "мету", "метой", "facebook", "фейсбук", "fb"],
        )
        .with_synonyms("ТикТок", &["tiktok", "тик ток"])
        .with_anchors(&["тоник", "аккаунт", "трафик"])
}

fn offers() -> FieldVocabulary {
    FieldVocabulary::new(
        FieldId::Offer,
        &[
            "Финансы",
            "Здоровье",
            "Крипто",
            "Нутра",
            "Гемблинг",
            "Дейтинг",
            "Образование",
            "E-commerce",
            "Игры",
            "Софт",
        ],
    )
    .with_synonyms("Финансы", &["финанс", "банк", "кредит"])
    .with_synonyms("Здоровье", &["здоров", "медиц", "лечен"])
    .with_synonyms("Крипто", &["крипт", "bitcoin", "btc"])
    .with_synonyms("Нутра", &["нутр"])
    .with_synonyms("Гемблинг", &["казино", "ставк", "игр"])
    .with_synonyms("Дейтинг", &["знакомств", "свидан"])
    .with_synonyms("Образование", &["обуч", "курс", "образов"])
    .with_synonyms("E-commerce", &["магазин", "товар", "продаж"])
    .with_synonyms("Софт", &["приложен", "софт", "программ"])
    .with_anchors(&["оффер"])
}

fn countries() -> FieldVocabulary {
    FieldVocabulary::new(
        FieldId::Country,
        &[
            "Россия",
            "США",
            "Германия",
            "Франция",
            "Великобритания",
            "Италия",
            "Испания",
            "Польша",
            "Украина",
            "Казахстан",
            "Беларусь",
            "Китай",
            "Япония",
            "Южная Корея",
            "Индия",
            "Бразилия",
            "Мексика",
            "Канада",
            "Австралия",
            "Турция",
        ],
    )
    .with_synonyms("Россия", &["рф", "россии", "россию", "россией"])
    .with_synonyms("США", &["америк"])
    .with_synonyms("Германия", &["германи"])
    .with_synonyms("Франция", &["франци"])
    .with_synonyms("Великобритания", &["англ", "британ"])
    .with_synonyms("Италия", &["итали"])
    .with_synonyms("Испания", &["испани"])
    .with_synonyms("Польша", &["польш"])
    .with_synonyms("Украина", &["украин"])
    .with_synonyms("Беларусь", &["беларус"])
    .with_synonyms("Китай", &["китая", "китае", "китаю", "китаем"])
    .with_synonyms("Япония", &["япони"])
    .with_synonyms("Южная Корея", &["кореи", "корее", "корею", "кореей"])
    .with_synonyms("Индия", &["индии", "индию", "индией"])
    .with_synonyms("Бразилия", &["бразили"])
    .with_synonyms("Мексика", &["мексик"])
    .with_synonyms("Канада", &["канад"])
    .with_synonyms("Австралия", &["австрали"])
    .with_synonyms("Турция", &["турци"])
    .with_anchors(&["стран"])
}

fn rk_options() -> FieldVocabulary {
    let values: Vec<String> = (1..=10_u8).map(|n| format!("РК-{n:03}")).collect();
    let refs: Vec<&str> = values.iter().map(String::as_str).collect();
    FieldVocabulary::new(FieldId::Rk, &refs)
        .with_pattern(RK_REGEX.clone())
        .with_anchors(&["рк"])
}

fn pixels() -> FieldVocabulary {
    FieldVocabulary::new(
        FieldId::Pixel,
        &[
            "Facebook Pixel",
            "TikTok Pixel",
            "Google Analytics",
            "Яндекс Метрика",
        ],
    )
    .with_synonyms("Google Analytics", &["аналитикс"])
    .with_synonyms("Яндекс Метрика", &["метрик"])
    .with_anchors(&["пиксел", "pixel"])
}
