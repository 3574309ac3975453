//! Outbound protocol client errors

use serde_json::Value;
use thiserror::Error;

/// Errors raised by a [`SwitchClient`](super::SwitchClient) request
///
/// The remote variant keeps the switch's diagnostic payload intact so it can
/// be surfaced unchanged to whoever drove the workflow.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    #[error("Transport error: {reason}")]
    Transport { reason: String },

    #[error("Remote error (HTTP {status})")]
    Remote {
        status: u16,
        error_information: Option<Value>,
    },
}

impl ClientError {
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: reason.into(),
        }
    }

    pub fn remote(status: u16, error_information: Option<Value>) -> Self {
        Self::Remote {
            status,
            error_information,
        }
    }

    /// HTTP status reported by the remote side, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }
}

/// Result type for outbound protocol requests
pub type ClientResult<T> = Result<T, ClientError>;
