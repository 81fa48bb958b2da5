//! Provider construction from a `provider/model` spec and loaded credentials.

use std::sync::Arc;

use crate::config::RemoteConfig;
use crate::credentials::Credentials;

use super::anthropic::AnthropicProvider;
use super::openai::OpenAiProvider;
use super::LlmProvider;

/// Provider resolution errors.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// Model spec is not in `<provider>/<model>` format.
    #[error("invalid model spec '{spec}', expected '<provider>/<model>'")]
    InvalidModelSpec {
        /// Invalid raw spec.
        spec: String,
    },
    /// Unsupported provider type in spec prefix.
    #[error("unsupported provider '{provider}'")]
    UnsupportedProvider {
        /// Unsupported provider prefix.
        provider: String,
    },
    /// Required API credential missing for selected provider.
    #[error("missing credential for provider '{provider}': {key}")]
    MissingCredential {
        /// Provider name.
        provider: String,
        /// Missing credential key.
        key: String,
    },
}

/// Default credential key for a provider prefix.
pub fn default_credential_key(provider: &str) -> Option<&'static str> {
    match provider {
        "openai" => Some("OPENAI_API_KEY"),
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        _ => None,
    }
}

/// Build the provider named by `remote.model`.
///
/// The API key is read from `remote.api_key_env` when set, otherwise from
/// the provider's default key.
///
/// # Errors
///
/// Returns [`RouterError`] for a malformed spec, an unknown provider, or a
/// missing credential.
pub fn resolve_provider(
    remote: &RemoteConfig,
    credentials: &Credentials,
) -> Result<Arc<dyn LlmProvider>, RouterError> {
    let (provider, model) =
        super::parse_provider_string(&remote.model).map_err(|_| RouterError::InvalidModelSpec {
            spec: remote.model.clone(),
        })?;

    let key_name = match (&remote.api_key_env, default_credential_key(provider)) {
        (Some(custom), _) => custom.as_str(),
        (None, Some(default)) => default,
        (None, None) => {
            return Err(RouterError::UnsupportedProvider {
                provider: provider.to_owned(),
            })
        }
    };

    let api_key = credentials
        .api_key(key_name)
        .ok_or_else(|| RouterError::MissingCredential {
            provider: provider.to_owned(),
            key: key_name.to_owned(),
        })?;

    match provider {
        "openai" => {
            let mut instance =
                OpenAiProvider::new(remote.model.clone(), model.to_owned(), api_key);
            if let Some(url) = &remote.base_url {
                instance = instance.with_endpoint(url.clone());
            }
            Ok(Arc::new(instance))
        }
        "anthropic" => {
            let mut instance =
                AnthropicProvider::new(remote.model.clone(), model.to_owned(), api_key);
            if let Some(url) = &remote.base_url {
                instance = instance.with_endpoint(url.clone());
            }
            Ok(Arc::new(instance))
        }
        _ => Err(RouterError::UnsupportedProvider {
            provider: provider.to_owned(),
        }),
    }
}
