use crate::cache::CacheError;
use crate::correlation::CorrelationError;
use crate::state_machine::StateMachineError;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by workflow operations
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Malformed or missing caller input; nothing was mutated
    #[error("{0}")]
    Validation(String),

    #[error("No persisted workflow found for cache key '{key}'")]
    NotFound { key: String },

    #[error(transparent)]
    StateMachine(#[from] StateMachineError),

    #[error(transparent)]
    Correlation(#[from] CorrelationError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Workflow data serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An action failed and the workflow was moved into its error state
    #[error(transparent)]
    ActionFailed(Box<ActionFailure>),
}

/// Original action error plus the data snapshot taken when it was captured
///
/// Displays exactly as the original error.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ActionFailure {
    pub source: WorkflowError,
    pub request_action_state: Value,
}

impl WorkflowError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// The error the failing action actually raised
    pub fn original(&self) -> &WorkflowError {
        match self {
            Self::ActionFailed(failure) => failure.source.original(),
            other => other,
        }
    }

    /// Data snapshot attached when the error drove the workflow into its error state
    pub fn request_action_state(&self) -> Option<&Value> {
        match self {
            Self::ActionFailed(failure) => Some(&failure.request_action_state),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.original(), Self::Validation(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.original(), Self::Correlation(err) if err.is_timeout())
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
