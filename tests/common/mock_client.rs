use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use switch_adapter_core::cache::CacheStore;
use switch_adapter_core::client::{ClientError, ClientResult, SwitchClient};

/// One recorded outbound request
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub verb: &'static str,
    pub payload: Value,
    pub destination: Option<String>,
}

/// Reply published on a channel while the outbound request is in flight
struct AutoReply {
    cache: Arc<dyn CacheStore>,
    channel: String,
    message: String,
}

/// Mock switch client for testing outbound requests
///
/// Records every call. Optionally fails every request, never completes it, or
/// publishes a configured reply from inside the request the way a fast switch
/// would.
#[derive(Default)]
pub struct MockSwitchClient {
    calls: Mutex<Vec<MockCall>>,
    failure: Mutex<Option<ClientError>>,
    auto_reply: Mutex<Option<AutoReply>>,
    stalled: Mutex<bool>,
}

impl MockSwitchClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every subsequent request with `error`
    pub fn fail_with(&self, error: ClientError) {
        *self.failure.lock() = Some(error);
    }

    /// Leave every subsequent request in flight forever
    pub fn stall(&self) {
        *self.stalled.lock() = true;
    }

    /// Publish `message` on `channel` during every subsequent request
    pub fn reply_with(
        &self,
        cache: Arc<dyn CacheStore>,
        channel: impl Into<String>,
        message: impl Into<String>,
    ) {
        *self.auto_reply.lock() = Some(AutoReply {
            cache,
            channel: channel.into(),
            message: message.into(),
        });
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    async fn record(
        &self,
        verb: &'static str,
        payload: &Value,
        destination: Option<&str>,
    ) -> ClientResult<()> {
        self.calls.lock().push(MockCall {
            verb,
            payload: payload.clone(),
            destination: destination.map(str::to_owned),
        });

        if let Some(error) = self.failure.lock().clone() {
            return Err(error);
        }

        let stalled = *self.stalled.lock();
        if stalled {
            std::future::pending::<()>().await;
        }

        let reply = self
            .auto_reply
            .lock()
            .as_ref()
            .map(|r| (r.cache.clone(), r.channel.clone(), r.message.clone()));
        if let Some((cache, channel, message)) = reply {
            cache
                .publish(&channel, &message)
                .await
                .map_err(|e| ClientError::transport(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl SwitchClient for MockSwitchClient {
    async fn post_transfers(&self, transfer: &Value, destination: Option<&str>) -> ClientResult<()> {
        self.record("post_transfers", transfer, destination).await
    }

    async fn post_quotes(&self, quote: &Value, destination: Option<&str>) -> ClientResult<()> {
        self.record("post_quotes", quote, destination).await
    }

    async fn get_parties(&self, party: &Value, destination: Option<&str>) -> ClientResult<()> {
        self.record("get_parties", party, destination).await
    }
}
