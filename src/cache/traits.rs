//! Cache store trait definition

use super::errors::CacheResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Callback invoked with the raw message for every publish on a subscribed channel.
pub type MessageHandler = Arc<dyn Fn(String) + Send + Sync>;

/// Opaque handle returned by [`CacheStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Allocate a fresh, globally unique subscription id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key/value store with publish/subscribe capability
///
/// Workflows persist their snapshots through `get`/`set` and correlate
/// asynchronous replies through `subscribe`/`publish`/`unsubscribe`.
/// Implementations must be safe to share across tasks.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a value by key
    ///
    /// Returns `Ok(Some(value))` when present, `Ok(None)` when the key is unknown.
    async fn get(&self, key: &str) -> CacheResult<Option<Value>>;

    /// Store a value, replacing whatever was stored under `key`
    async fn set(&self, key: &str, value: &Value) -> CacheResult<()>;

    /// Publish a raw message, returning how many subscribers were notified
    async fn publish(&self, channel: &str, message: &str) -> CacheResult<usize>;

    /// Register `handler` for every subsequent publish on `channel`
    async fn subscribe(&self, channel: &str, handler: MessageHandler)
        -> CacheResult<SubscriptionId>;

    /// Remove a subscription. Returns `false` if it was not registered.
    async fn unsubscribe(&self, channel: &str, id: SubscriptionId) -> CacheResult<bool>;

    /// Get the name of the cache provider
    fn provider_name(&self) -> &'static str;
}
