//! # Switch Client Traits
//!
//! Defines the outbound verbs a workflow's action handler may use. Every verb
//! only acknowledges that the request was accepted; the actual reply arrives
//! later on the workflow's correlation channel.

use super::errors::ClientResult;
use async_trait::async_trait;
use serde_json::Value;

/// Outbound protocol client for the payment switch
#[async_trait]
pub trait SwitchClient: Send + Sync {
    /// Post a transfer request to the destination participant
    async fn post_transfers(&self, transfer: &Value, destination: Option<&str>)
        -> ClientResult<()>;

    /// Post a quote request to the destination participant
    async fn post_quotes(&self, quote: &Value, destination: Option<&str>) -> ClientResult<()>;

    /// Request party information from the destination participant
    async fn get_parties(&self, party: &Value, destination: Option<&str>) -> ClientResult<()>;
}
