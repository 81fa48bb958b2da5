//! Credential loading from the runtime `.env` file and the process environment.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::config::config_dir;

/// Environment keys consulted for remote interpreter credentials.
pub const KNOWN_KEYS: [&str; 2] = ["OPENAI_API_KEY", "ANTHROPIC_API_KEY"];

/// Runtime credentials (key/value pairs).
#[derive(Clone, Default)]
pub struct Credentials {
    vars: BTreeMap<String, String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("keys", &self.vars.keys().collect::<Vec<_>>())
            .field("values", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Build credentials from a key-value map.
    pub fn from_map(vars: BTreeMap<String, String>) -> Self {
        Self { vars }
    }

    /// Returns a non-blank credential value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Returns an API key for a credential name, if present.
    pub fn api_key(&self, key: &str) -> Option<ApiKey> {
        self.get(key).map(|value| ApiKey(value.trim().to_owned()))
    }

    /// Overlay values from process environment variables.
    ///
    /// Environment values win over `.env` values.
    pub fn with_env_overrides(mut self, keys: &[&str]) -> Self {
        for key in keys {
            if let Ok(value) = std::env::var(key) {
                if !value.trim().is_empty() {
                    debug!(key, "credential taken from environment");
                    self.vars.insert((*key).to_owned(), value);
                }
            }
        }
        self
    }
}

/// An API key. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key for request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ApiKey").field(&"[REDACTED]").finish()
    }
}

/// Load credentials from a specific `.env` path.
///
/// # Errors
///
/// Returns an error if the file does not exist, permissions are too broad,
/// or parsing fails.
pub fn load_credentials(path: &Path) -> anyhow::Result<Credentials> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "credentials file does not exist: {}",
            path.display()
        ));
    }

    validate_private_permissions(path)?;

    let mut vars = BTreeMap::new();
    let iter = dotenvy::from_path_iter(path)
        .with_context(|| format!("failed to read credentials at {}", path.display()))?;

    for item in iter {
        let (key, value) = item.with_context(|| {
            format!(
                "failed to parse key-value entry in credentials file {}",
                path.display()
            )
        })?;
        vars.insert(key, value);
    }

    Ok(Credentials { vars })
}

/// Load `~/.kampania/.env` when present, then overlay [`KNOWN_KEYS`] (and
/// `extra_key`) from the process environment.
///
/// A missing `.env` is not an error: the remote interpreter is simply left
/// unconfigured unless the environment provides a key.
///
/// # Errors
///
/// Returns an error when an existing credentials file is invalid.
pub fn load_default_credentials(extra_key: Option<&str>) -> anyhow::Result<Credentials> {
    let env_file = config_dir()?.join(".env");
    let base = if env_file.exists() {
        load_credentials(&env_file)?
    } else {
        debug!(path = %env_file.display(), "no credentials file");
        Credentials::default()
    };

    let mut keys: Vec<&str> = KNOWN_KEYS.to_vec();
    if let Some(extra) = extra_key {
        keys.push(extra);
    }
    Ok(base.with_env_overrides(&keys))
}

#[cfg(unix)]
fn validate_private_permissions(path: &Path) -> anyhow::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path)
        .with_context(|| format!("failed to inspect credentials file {}", path.display()))?;
    let mode = metadata.permissions().mode() & 0o777;

    if mode & 0o077 != 0 {
        return Err(anyhow::anyhow!(
            "credentials file {} must be 0600, found {:o}",
            path.display(),
            mode
        ));
    }

    Ok(())
}

#[cfg(not(unix))]
fn validate_private_permissions(_path: &Path) -> anyhow::Result<()> {
    Ok(())
}
