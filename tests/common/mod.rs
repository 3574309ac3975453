#![allow(dead_code)]

pub mod log_capture;
pub mod mock_client;
pub mod recording_cache;
pub mod strategies;

pub use log_capture::*;
pub use mock_client::*;
pub use recording_cache::*;

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use switch_adapter_core::config::{AdapterConfig, WorkflowConfig};
use switch_adapter_core::workflows::ActionArgs;

/// Reply timeout used by workflow tests
pub const TEST_TIMEOUT: Duration = Duration::from_secs(1);

/// Recording cache, mock client and the workflow config wired to both
pub struct TestHarness {
    pub cache: Arc<RecordingCache>,
    pub client: Arc<MockSwitchClient>,
    pub config: WorkflowConfig,
}

impl TestHarness {
    pub fn new() -> Self {
        let cache = Arc::new(RecordingCache::new());
        let client = Arc::new(MockSwitchClient::new());
        let adapter = AdapterConfig {
            dfsp_id: "payerfsp".to_string(),
            ..AdapterConfig::default()
        };
        let config = WorkflowConfig::new(cache.clone(), client.clone(), &adapter)
            .with_request_processing_timeout(TEST_TIMEOUT);

        Self {
            cache,
            client,
            config,
        }
    }

    /// Have the mock client publish `message` on `channel` while sending
    pub fn reply_during_send(&self, channel: &str, message: &str) {
        self.client.reply_with(self.cache.clone(), channel, message);
    }
}

/// Transfer arguments for `transfer_id` routed to `payeefsp`
pub fn transfer_args(transfer_id: &str) -> ActionArgs {
    ActionArgs::new()
        .with_id(transfer_id)
        .with_fsp_id("payeefsp")
        .with_payload(json!({
            "transferId": transfer_id,
            "amount": {"amount": "100", "currency": "USD"},
        }))
}

/// Well-formed transfer fulfil reply
pub fn fulfil_reply() -> serde_json::Value {
    json!({
        "fulfilment": "WLctttbu2HvTsa1XWvUoGRcQozHsqeu9Ahl2JW9Bsu8",
        "completedTimestamp": "2026-10-14T09:00:00.000Z",
        "transferState": "COMMITTED",
    })
}
