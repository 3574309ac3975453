//! # Workflow Context
//!
//! The unit of persistence for a persistent state machine: the workflow's
//! domain data plus the handles needed to save it.
//!
//! `data` is opaque to the engine. The only field the engine cares about is
//! the business-visible current state, reached through [`WorkflowData`]. That
//! field is written solely by the after-transition hook, so it can lag the
//! engine's state while a handler runs but is never ahead of it.

use super::states::MachineState;
use crate::cache::CacheStore;
use crate::error::WorkflowResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::Span;

/// Domain data a persistent state machine can snapshot and restore
pub trait WorkflowData: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type State: MachineState;

    /// Business-visible status mirrored from the machine state, if any
    fn current_state(&self) -> Option<Self::State>;

    fn set_current_state(&mut self, state: Self::State);
}

/// Data, cache key, cache handle and log span of one workflow instance
pub struct WorkflowContext<D> {
    pub data: D,
    cache_key: String,
    cache: Arc<dyn CacheStore>,
    span: Span,
}

impl<D: std::fmt::Debug> std::fmt::Debug for WorkflowContext<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowContext")
            .field("data", &self.data)
            .field("cache_key", &self.cache_key)
            .field("cache", &self.cache.provider_name())
            .finish()
    }
}

impl<D: WorkflowData> WorkflowContext<D> {
    pub fn new(data: D, cache_key: impl Into<String>, cache: Arc<dyn CacheStore>, span: Span) -> Self {
        Self {
            data,
            cache_key: cache_key.into(),
            cache,
            span,
        }
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    /// Span every log event of this workflow instance is parented to
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Overwrite the persisted snapshot with the current data
    pub async fn persist(&self) -> WorkflowResult<()> {
        let snapshot = serde_json::to_value(&self.data)?;
        self.cache.set(&self.cache_key, &snapshot).await?;
        Ok(())
    }
}
