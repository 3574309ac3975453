//! Adapter configuration
//!
//! Values are layered with the `config` crate: built-in defaults, then an
//! optional TOML file, then `SWITCH_ADAPTER_*` environment variables (nested
//! keys use `__`, e.g. `SWITCH_ADAPTER_LOGGING__LEVEL=debug`).

use crate::cache::CacheStore;
use crate::client::SwitchClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const ENV_PREFIX: &str = "SWITCH_ADAPTER";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Identifier of the participant this adapter acts for
    #[serde(default = "default_dfsp_id")]
    pub dfsp_id: String,

    /// How long an action waits for its correlated reply
    #[serde(default = "default_request_processing_timeout")]
    pub request_processing_timeout_seconds: u64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_dfsp_id() -> String {
    "switch-adapter".to_string()
}

fn default_request_processing_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            dfsp_id: default_dfsp_id(),
            request_processing_timeout_seconds: default_request_processing_timeout(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AdapterConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&str>) -> ConfigResult<Self> {
        let mut builder = ::config::Config::builder()
            .add_source(::config::Config::try_from(&AdapterConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(::config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AdapterConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.dfsp_id.trim().is_empty() {
            return Err(ConfigError::Invalid("dfsp_id must not be empty".to_string()));
        }
        if self.request_processing_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "request_processing_timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_processing_timeout(&self) -> Duration {
        Duration::from_secs(self.request_processing_timeout_seconds)
    }
}

/// Runtime handles and settings a workflow is created or loaded with
#[derive(Clone)]
pub struct WorkflowConfig {
    pub cache: Arc<dyn CacheStore>,
    pub client: Arc<dyn SwitchClient>,
    pub dfsp_id: String,
    pub request_processing_timeout: Duration,
}

impl std::fmt::Debug for WorkflowConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowConfig")
            .field("cache", &self.cache.provider_name())
            .field("dfsp_id", &self.dfsp_id)
            .field("request_processing_timeout", &self.request_processing_timeout)
            .finish()
    }
}

impl WorkflowConfig {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        client: Arc<dyn SwitchClient>,
        adapter: &AdapterConfig,
    ) -> Self {
        Self {
            cache,
            client,
            dfsp_id: adapter.dfsp_id.clone(),
            request_processing_timeout: adapter.request_processing_timeout(),
        }
    }

    #[must_use]
    pub fn with_request_processing_timeout(mut self, timeout: Duration) -> Self {
        self.request_processing_timeout = timeout;
        self
    }
}
