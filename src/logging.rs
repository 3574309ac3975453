//! # Structured Logging Module
//!
//! Environment-aware structured logging for workflow execution. Every
//! workflow instance logs under its own span (workflow name, cache key and
//! participant), so the subscriber installed here is the only global piece.

use crate::config::LoggingConfig;
use chrono::Utc;
use std::sync::OnceLock;
use tracing::Span;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging once per process
///
/// `RUST_LOG` wins over the configured level. An already-installed global
/// subscriber is left in place.
pub fn init_structured_logging(config: &LoggingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment, &config.level);
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(config.json.then(|| {
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
            }))
            .with((!config.json).then(|| {
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_level(true)
            }));

        if subscriber.try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }

        tracing::info!(
            environment = %environment,
            log_level = %log_level,
            json = config.json,
            "Structured logging initialized"
        );
    });
}

/// Get current environment from environment variables
pub fn get_environment() -> String {
    std::env::var("SWITCH_ADAPTER_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
///
/// Test runs always log at debug; elsewhere the configured level applies.
pub fn get_log_level(environment: &str, configured: &str) -> String {
    match environment {
        "test" => "debug".to_string(),
        _ if configured.trim().is_empty() => "info".to_string(),
        _ => configured.to_string(),
    }
}

/// Log structured data for a completed workflow operation
pub fn log_workflow_operation(
    span: &Span,
    operation: &str,
    workflow: &str,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        parent: span,
        operation = %operation,
        workflow = %workflow,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "WORKFLOW_OPERATION"
    );
}
