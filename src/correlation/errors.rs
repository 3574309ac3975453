//! Correlation error types

use crate::cache::CacheError;
use crate::client::ClientError;
use thiserror::Error;

/// Failure modes of a single awaited reply
#[derive(Debug, Error)]
pub enum CorrelationError {
    /// No reply was published on the channel within the window
    #[error("Timed out after {timeout_ms}ms waiting for a reply on channel '{channel}'")]
    Timeout { channel: String, timeout_ms: u64 },

    /// A reply arrived but was not valid JSON
    #[error("Malformed correlation payload on channel '{channel}': {source}")]
    MalformedPayload {
        channel: String,
        #[source]
        source: serde_json::Error,
    },

    /// The outbound request issued alongside the wait failed
    #[error(transparent)]
    Send(#[from] ClientError),

    /// Subscribing to the channel failed
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Reply handler for channel '{channel}' was dropped before a reply arrived")]
    ChannelClosed { channel: String },
}

impl CorrelationError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type for correlated waits
pub type CorrelationResult<T> = Result<T, CorrelationError>;
