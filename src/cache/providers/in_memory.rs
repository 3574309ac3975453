//! In-process cache provider
//!
//! Keeps values as serialized JSON strings so a snapshot read back from the
//! store is always a fresh deserialized copy, never a shared reference.
//!
//! **Important**: This cache is NOT distributed. Each process maintains its own
//! keys and subscriptions, so a reply published by another process will never
//! reach a subscriber registered here.

use crate::cache::errors::CacheResult;
use crate::cache::traits::{CacheStore, MessageHandler, SubscriptionId};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// In-memory key/value store with synchronous pub/sub delivery
#[derive(Default)]
pub struct InMemoryCache {
    entries: DashMap<String, String>,
    subscriptions: RwLock<HashMap<String, Vec<(SubscriptionId, MessageHandler)>>>,
}

impl std::fmt::Debug for InMemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCache")
            .field("entry_count", &self.entries.len())
            .field("channel_count", &self.subscriptions.read().len())
            .finish()
    }
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscriptions on `channel`
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.subscriptions
            .read()
            .get(channel)
            .map_or(0, |handlers| handlers.len())
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        let Some(raw) = self.entries.get(key).map(|entry| entry.value().clone()) else {
            debug!(key = key, "Cache MISS (memory)");
            return Ok(None);
        };

        debug!(key = key, "Cache HIT (memory)");
        Ok(Some(serde_json::from_str(&raw)?))
    }

    async fn set(&self, key: &str, value: &Value) -> CacheResult<()> {
        let raw = serde_json::to_string(value)?;
        self.entries.insert(key.to_string(), raw);
        debug!(key = key, "Cache SET (memory)");
        Ok(())
    }

    async fn publish(&self, channel: &str, message: &str) -> CacheResult<usize> {
        // Handlers run outside the lock so they may subscribe or unsubscribe freely
        let handlers: Vec<MessageHandler> = self
            .subscriptions
            .read()
            .get(channel)
            .map(|entries| entries.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        for handler in &handlers {
            handler(message.to_string());
        }

        debug!(
            channel = channel,
            receivers = handlers.len(),
            "Published message (memory)"
        );
        Ok(handlers.len())
    }

    async fn subscribe(
        &self,
        channel: &str,
        handler: MessageHandler,
    ) -> CacheResult<SubscriptionId> {
        let id = SubscriptionId::new();
        self.subscriptions
            .write()
            .entry(channel.to_string())
            .or_default()
            .push((id, handler));

        debug!(channel = channel, subscription_id = %id, "Subscribed (memory)");
        Ok(id)
    }

    async fn unsubscribe(&self, channel: &str, id: SubscriptionId) -> CacheResult<bool> {
        let mut subscriptions = self.subscriptions.write();
        let Some(handlers) = subscriptions.get_mut(channel) else {
            return Ok(false);
        };

        let before = handlers.len();
        handlers.retain(|(existing, _)| *existing != id);
        let removed = handlers.len() != before;

        if handlers.is_empty() {
            subscriptions.remove(channel);
        }

        debug!(
            channel = channel,
            subscription_id = %id,
            removed = removed,
            "Unsubscribed (memory)"
        );
        Ok(removed)
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}
