//! Configuration loading and validation.
//!
//! Loaded from `--config`, `$KAMPANIA_CONFIG_PATH`, or `~/.kampania/config.toml`
//! (first one that applies). Every section is optional. Environment variables
//! override file values; file values override defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::bulk_update::BulkUpdateRules;
use crate::combinations::DraftPolicy;
use crate::vocabulary::{FieldId, VocabularyRegistry};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote (LLM) interpreter settings.
    pub remote: RemoteConfig,
    /// Required fields and per-field defaults for new drafts.
    pub drafts: DraftsConfig,
    /// Bulk-update command phrases.
    pub bulk_update: BulkUpdateConfig,
    /// Extra synonyms and anchors per field, keyed by field wire key.
    pub vocabulary: BTreeMap<String, VocabularyOverride>,
}

/// Remote interpreter settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Set to `false` to always interpret locally.
    pub enabled: bool,
    /// Model spec in `<provider>/<model>` form.
    pub model: String,
    /// Credential key holding the API key (defaults per provider).
    pub api_key_env: Option<String>,
    /// Override of the provider endpoint URL.
    pub base_url: Option<String>,
    /// Upper bound on one remote call before falling back.
    pub timeout_secs: u64,
    /// Completion token limit.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "openai/gpt-4o-mini".to_owned(),
            api_key_env: None,
            base_url: None,
            timeout_secs: 20,
            max_tokens: 1000,
            temperature: 0.1,
        }
    }
}

impl RemoteConfig {
    /// Remote call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Draft completion policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DraftsConfig {
    /// Fields reported as missing when unset.
    pub required: Vec<FieldId>,
    /// Default values keyed by field wire key.
    pub defaults: BTreeMap<String, String>,
}

impl Default for DraftsConfig {
    fn default() -> Self {
        let policy = DraftPolicy::default();
        Self {
            required: policy.required().to_vec(),
            defaults: FieldId::ALL
                .into_iter()
                .filter_map(|field| {
                    policy
                        .default_for(field)
                        .map(|value| (field.key().to_owned(), value.to_owned()))
                })
                .collect(),
        }
    }
}

/// Bulk-update command phrases.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BulkUpdateConfig {
    /// Phrase that marks a bulk-update command.
    pub trigger: String,
    /// Words joining the field and the new value.
    pub connectives: Vec<String>,
}

impl Default for BulkUpdateConfig {
    fn default() -> Self {
        let rules = BulkUpdateRules::default();
        Self {
            trigger: rules.trigger().to_owned(),
            connectives: rules.connectives().to_vec(),
        }
    }
}

/// Operator-editable keyword patterns for one field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VocabularyOverride {
    /// Trigger phrase → canonical value.
    pub synonyms: BTreeMap<String, String>,
    /// Extra bulk-update anchors.
    pub anchors: Vec<String>,
}

impl Config {
    /// Load configuration, applying environment overrides.
    ///
    /// An explicit `path` must exist. Without one, `$KAMPANIA_CONFIG_PATH` or
    /// the default location is used, and a missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or parsed, or if the
    /// resulting settings fail [`Config::validate`].
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => load_config(path)?,
            None => {
                let path = match std::env::var("KAMPANIA_CONFIG_PATH") {
                    Ok(p) => PathBuf::from(p),
                    Err(_) => config_dir()?.join("config.toml"),
                };
                if path.exists() {
                    load_config(&path)?
                } else {
                    tracing::debug!(path = %path.display(), "no config file found, using defaults");
                    Self::default()
                }
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Check settings that parse but cannot work.
    ///
    /// # Errors
    ///
    /// Returns an error when the remote timeout is zero.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.remote.timeout_secs == 0 {
            anyhow::bail!("[remote].timeout_secs must be greater than zero");
        }
        Ok(())
    }

    /// Parse a TOML string into config.
    ///
    /// # Errors
    ///
    /// Returns an error on invalid TOML or mistyped values.
    pub fn from_toml(toml_str: &str) -> anyhow::Result<Self> {
        toml::from_str(toml_str).context("failed to parse config TOML")
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function for testability.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("KAMPANIA_REMOTE_MODEL") {
            self.remote.model = v;
        }
        if let Some(v) = env("KAMPANIA_REMOTE_BASE_URL") {
            self.remote.base_url = Some(v);
        }
        if let Some(v) = env("KAMPANIA_REMOTE_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.remote.timeout_secs = n,
                Err(_) => tracing::warn!(
                    var = "KAMPANIA_REMOTE_TIMEOUT_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("KAMPANIA_REMOTE_ENABLED") {
            match v.parse() {
                Ok(flag) => self.remote.enabled = flag,
                Err(_) => tracing::warn!(
                    var = "KAMPANIA_REMOTE_ENABLED",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
    }

    /// Built-in vocabularies extended with the configured keyword patterns.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown field key, a blank phrase, or a
    /// synonym whose target is not a canonical value.
    pub fn registry(&self) -> anyhow::Result<VocabularyRegistry> {
        let mut registry = VocabularyRegistry::builtin();
        for (key, edits) in &self.vocabulary {
            let field: FieldId = key
                .parse()
                .with_context(|| format!("invalid [vocabulary.{key}] section"))?;
            let vocabulary = registry.get_mut(field);
            for (phrase, target) in &edits.synonyms {
                vocabulary
                    .add_synonym(phrase, target)
                    .with_context(|| format!("invalid synonym '{phrase}' in [vocabulary.{key}]"))?;
            }
            for anchor in &edits.anchors {
                vocabulary
                    .add_anchor(anchor)
                    .with_context(|| format!("invalid anchor in [vocabulary.{key}]"))?;
            }
        }
        Ok(registry)
    }

    /// Draft policy validated against the registry.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown field key or a non-canonical default.
    pub fn draft_policy(&self, registry: &VocabularyRegistry) -> anyhow::Result<DraftPolicy> {
        let mut defaults = BTreeMap::new();
        for (key, value) in &self.drafts.defaults {
            let field: FieldId = key
                .parse()
                .with_context(|| format!("invalid key '{key}' in [drafts.defaults]"))?;
            defaults.insert(field, value.clone());
        }
        DraftPolicy::new(self.drafts.required.clone(), defaults, registry)
            .context("invalid [drafts] section")
    }

    /// Bulk-update recognizer rules.
    ///
    /// # Errors
    ///
    /// Returns an error when the trigger phrase is blank.
    pub fn bulk_rules(&self) -> anyhow::Result<BulkUpdateRules> {
        if self.bulk_update.trigger.trim().is_empty() {
            anyhow::bail!("[bulk_update].trigger must not be empty");
        }
        let connectives: Vec<&str> = self
            .bulk_update
            .connectives
            .iter()
            .map(String::as_str)
            .collect();
        Ok(BulkUpdateRules::new(&self.bulk_update.trigger, &connectives))
    }
}

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config at {}: {e}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config at {}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Resolve the default config directory (`~/.kampania/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn config_dir() -> anyhow::Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
    Ok(home.home_dir().join(".kampania"))
}
