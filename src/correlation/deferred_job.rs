//! One-shot subscribe/await/unsubscribe over a cache channel.

use super::errors::{CorrelationError, CorrelationResult};
use crate::cache::{CacheStore, MessageHandler, SubscriptionId};
use crate::client::ClientResult;
use parking_lot::Mutex;
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// A single awaited reply on a correlation channel
///
/// Each job owns its own subscription, so concurrent jobs on the same channel
/// settle independently of one another.
pub struct DeferredJob {
    cache: Arc<dyn CacheStore>,
    channel: String,
}

impl std::fmt::Debug for DeferredJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredJob")
            .field("channel", &self.channel)
            .field("provider", &self.cache.provider_name())
            .finish()
    }
}

impl DeferredJob {
    /// Job that will await the next message published on `channel`
    pub fn listen_on(cache: Arc<dyn CacheStore>, channel: impl Into<String>) -> Self {
        Self {
            cache,
            channel: channel.into(),
        }
    }

    /// Correlation channel this job listens on
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Wait for one reply without issuing any outbound request
    pub async fn wait(self, timeout: Duration) -> CorrelationResult<Value> {
        self.send_and_wait(async { Ok(()) }, timeout).await
    }

    /// Subscribe, run `send`, then wait for the reply
    ///
    /// The subscription exists before `send` starts, so a reply published while
    /// the request is still in flight is not lost. `timeout` bounds the send and
    /// the reply wait together, counted from the moment of subscribing.
    pub async fn send_and_wait<F>(self, send: F, timeout: Duration) -> CorrelationResult<Value>
    where
        F: Future<Output = ClientResult<()>> + Send,
    {
        let (reply_tx, reply_rx) = oneshot::channel::<String>();
        let slot = Arc::new(Mutex::new(Some(reply_tx)));

        let handler: MessageHandler = Arc::new(move |message: String| {
            // Only the first delivery settles the job
            if let Some(reply_tx) = slot.lock().take() {
                let _ = reply_tx.send(message);
            }
        });

        let id = self.cache.subscribe(&self.channel, handler).await?;
        let subscription = Subscription::new(self.cache.clone(), self.channel.clone(), id);
        debug!(channel = %self.channel, subscription_id = %id, "Awaiting correlated reply");

        let outcome = self.settle(send, reply_rx, timeout).await;
        subscription.release().await;

        if let Err(error) = &outcome {
            debug!(channel = %self.channel, error = %error, "Correlated wait failed");
        }
        outcome
    }

    async fn settle<F>(
        &self,
        send: F,
        reply_rx: oneshot::Receiver<String>,
        timeout: Duration,
    ) -> CorrelationResult<Value>
    where
        F: Future<Output = ClientResult<()>> + Send,
    {
        let exchange = async {
            send.await?;
            reply_rx.await.map_err(|_| CorrelationError::ChannelClosed {
                channel: self.channel.clone(),
            })
        };

        let raw = match tokio::time::timeout(timeout, exchange).await {
            Ok(outcome) => outcome?,
            Err(_) => {
                return Err(CorrelationError::Timeout {
                    channel: self.channel.clone(),
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                })
            }
        };

        serde_json::from_str(&raw).map_err(|source| CorrelationError::MalformedPayload {
            channel: self.channel.clone(),
            source,
        })
    }
}

/// Live subscription that is unsubscribed exactly once
struct Subscription {
    cache: Arc<dyn CacheStore>,
    channel: String,
    id: SubscriptionId,
    released: AtomicBool,
}

impl Subscription {
    fn new(cache: Arc<dyn CacheStore>, channel: String, id: SubscriptionId) -> Self {
        Self {
            cache,
            channel,
            id,
            released: AtomicBool::new(false),
        }
    }

    async fn release(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }

        match self.cache.unsubscribe(&self.channel, self.id).await {
            Ok(true) => {
                debug!(channel = %self.channel, subscription_id = %self.id, "Released subscription")
            }
            Ok(false) => warn!(
                channel = %self.channel,
                subscription_id = %self.id,
                "Subscription was already gone when released"
            ),
            Err(error) => warn!(
                channel = %self.channel,
                subscription_id = %self.id,
                error = %error,
                "Failed to release subscription"
            ),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if *self.released.get_mut() {
            return;
        }

        // The waiting future was dropped before settling
        let cache = self.cache.clone();
        let channel = std::mem::take(&mut self.channel);
        let id = self.id;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(error) = cache.unsubscribe(&channel, id).await {
                        warn!(channel = %channel, error = %error, "Failed to release abandoned subscription");
                    }
                });
            }
            Err(_) => warn!(
                channel = %channel,
                subscription_id = %id,
                "No runtime available to release abandoned subscription"
            ),
        }
    }
}
