use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use switch_adapter_core::cache::{
    CacheResult, CacheStore, InMemoryCache, MessageHandler, SubscriptionId,
};

/// In-memory cache that records every call made through the store interface
#[derive(Debug, Default)]
pub struct RecordingCache {
    inner: InMemoryCache,
    get_calls: Mutex<Vec<String>>,
    set_calls: Mutex<Vec<String>>,
    subscribes: AtomicUsize,
    unsubscribes: AtomicUsize,
    deliveries: Arc<AtomicUsize>,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys passed to `get`, in call order
    pub fn get_calls(&self) -> Vec<String> {
        self.get_calls.lock().clone()
    }

    /// Keys passed to `set`, in call order
    pub fn set_calls(&self) -> Vec<String> {
        self.set_calls.lock().clone()
    }

    pub fn subscribe_count(&self) -> usize {
        self.subscribes.load(Ordering::SeqCst)
    }

    pub fn unsubscribe_count(&self) -> usize {
        self.unsubscribes.load(Ordering::SeqCst)
    }

    /// Times any subscribed handler was invoked
    pub fn deliveries(&self) -> usize {
        self.deliveries.load(Ordering::SeqCst)
    }

    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.inner.subscriber_count(channel)
    }

    /// Wait until `channel` has a live subscription
    pub async fn wait_for_subscriber(&self, channel: &str) {
        while self.subscriber_count(channel) == 0 {
            tokio::task::yield_now().await;
        }
    }

    /// Read a snapshot without recording the call
    pub async fn peek(&self, key: &str) -> Option<Value> {
        self.inner.get(key).await.ok().flatten()
    }

    /// Write a snapshot without recording the call
    pub async fn seed(&self, key: &str, value: Value) {
        self.inner.set(key, &value).await.unwrap();
    }
}

#[async_trait]
impl CacheStore for RecordingCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Value>> {
        self.get_calls.lock().push(key.to_string());
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &Value) -> CacheResult<()> {
        self.set_calls.lock().push(key.to_string());
        self.inner.set(key, value).await
    }

    async fn publish(&self, channel: &str, message: &str) -> CacheResult<usize> {
        self.inner.publish(channel, message).await
    }

    async fn subscribe(&self, channel: &str, handler: MessageHandler) -> CacheResult<SubscriptionId> {
        self.subscribes.fetch_add(1, Ordering::SeqCst);
        let deliveries = self.deliveries.clone();
        let counted: MessageHandler = Arc::new(move |message: String| {
            deliveries.fetch_add(1, Ordering::SeqCst);
            (*handler)(message);
        });
        self.inner.subscribe(channel, counted).await
    }

    async fn unsubscribe(&self, channel: &str, id: SubscriptionId) -> CacheResult<bool> {
        self.unsubscribes.fetch_add(1, Ordering::SeqCst);
        self.inner.unsubscribe(channel, id).await
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}
