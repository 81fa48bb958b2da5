//! Interpreters turning an operator message into an [`InterpretationResult`].
//!
//! - [`local::LocalInterpreter`]: deterministic keyword pipeline, never fails
//! - [`remote::RemoteInterpreter`]: LLM-backed, same result contract
//!
//! [`FallbackInterpreter`] tries the remote interpreter first (when
//! configured) and falls back to the local one on any failure, per call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::campaign::InterpretationResult;
use crate::config::Config;
use crate::credentials::Credentials;
use crate::providers::ProviderError;

pub mod local;
pub mod remote;

use local::LocalInterpreter;
use remote::RemoteInterpreter;

/// One message to interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpretRequest {
    /// Raw operator text.
    pub text: String,
    /// Number of records that currently exist; only used to phrase
    /// bulk-update confirmations.
    pub existing_records: usize,
}

impl InterpretRequest {
    /// Build a request.
    pub fn new(text: impl Into<String>, existing_records: usize) -> Self {
        Self {
            text: text.into(),
            existing_records,
        }
    }
}

/// Errors from an interpreter call.
#[derive(Debug, thiserror::Error)]
pub enum InterpretError {
    /// The interpreter cannot run with the current configuration.
    #[error("interpreter not configured: {0}")]
    NotConfigured(String),
    /// Transport or HTTP failure talking to the provider.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// The reply did not follow the result contract.
    #[error("malformed interpreter reply: {0}")]
    Malformed(String),
    /// The call did not finish in time.
    #[error("interpreter timed out after {0:?}")]
    Timeout(Duration),
}

/// Common interface of all interpreters.
#[async_trait]
pub trait Interpreter: Send + Sync {
    /// Interpret one message.
    ///
    /// # Errors
    ///
    /// Returns [`InterpretError`] when the interpreter could not produce a
    /// result that follows the contract.
    async fn interpret(
        &self,
        request: &InterpretRequest,
    ) -> Result<InterpretationResult, InterpretError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Remote-first interpreter with a deterministic local fallback.
pub struct FallbackInterpreter {
    remote: Option<Arc<dyn Interpreter>>,
    local: LocalInterpreter,
    timeout: Duration,
}

impl FallbackInterpreter {
    /// Interpreter that only runs the local pipeline.
    pub fn local_only(local: LocalInterpreter) -> Self {
        Self {
            remote: None,
            local,
            timeout: Duration::ZERO,
        }
    }

    /// Interpreter that tries `remote` first, bounded by `timeout`.
    pub fn with_remote(
        remote: Arc<dyn Interpreter>,
        local: LocalInterpreter,
        timeout: Duration,
    ) -> Self {
        Self {
            remote: Some(remote),
            local,
            timeout,
        }
    }

    /// Build from configuration and credentials.
    ///
    /// The remote path is attached only when enabled, not disabled by
    /// `force_local`, and its credential is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the vocabulary, draft, or bulk-update sections of
    /// the configuration are invalid.
    pub fn from_config(
        config: &Config,
        credentials: &Credentials,
        force_local: bool,
    ) -> anyhow::Result<Self> {
        let registry = Arc::new(config.registry()?);
        let policy = config.draft_policy(&registry)?;
        let local = LocalInterpreter::new(
            Arc::clone(&registry),
            policy.clone(),
            config.bulk_rules()?,
        );

        if force_local || !config.remote.enabled {
            debug!("remote interpreter disabled");
            return Ok(Self::local_only(local));
        }

        match RemoteInterpreter::from_config(&config.remote, credentials, registry, policy) {
            Ok(remote) => {
                info!(model = %remote.name(), "remote interpreter configured");
                Ok(Self::with_remote(
                    Arc::new(remote),
                    local,
                    config.remote.timeout(),
                ))
            }
            Err(e) => {
                info!(reason = %e, "remote interpreter unavailable, using local interpreter");
                Ok(Self::local_only(local))
            }
        }
    }

    /// Whether a remote interpreter is attached.
    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// The local interpreter.
    pub fn local(&self) -> &LocalInterpreter {
        &self.local
    }

    /// Interpret a message. Never fails: remote errors are logged and the
    /// local result is returned instead.
    pub async fn interpret(&self, request: &InterpretRequest) -> InterpretationResult {
        if let Some(remote) = &self.remote {
            match self.try_remote(remote.as_ref(), request).await {
                Ok(result) => {
                    info!(interpreter = %remote.name(), kind = result.kind(), "message interpreted");
                    return result;
                }
                Err(e) => {
                    warn!(
                        interpreter = %remote.name(),
                        error = %e,
                        "remote interpreter failed, falling back to local"
                    );
                }
            }
        }

        let result = self.local.interpret_message(request);
        info!(interpreter = "local", kind = result.kind(), "message interpreted");
        result
    }

    async fn try_remote(
        &self,
        remote: &dyn Interpreter,
        request: &InterpretRequest,
    ) -> Result<InterpretationResult, InterpretError> {
        tokio::time::timeout(self.timeout, remote.interpret(request))
            .await
            .map_err(|_| InterpretError::Timeout(self.timeout))?
    }
}
