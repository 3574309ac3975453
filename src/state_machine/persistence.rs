//! # Persistent State Machine
//!
//! Wraps the [`StateMachine`] engine with cache-backed durability. The PSM
//! wires two hooks into every fired transition:
//!
//! - **after transition**: mirror the new state into the data's current state,
//!   then overwrite the snapshot under the workflow's cache key
//! - **on error**: log the failed transition with the workflow's span
//!
//! A machine reloaded with [`PersistentStateMachine::load_from_cache`] gets the
//! same table and hooks, with its state taken from the snapshot. No transition
//! is re-fired on reload.

use super::context::{WorkflowContext, WorkflowData};
use super::engine::{StateMachine, TransitionHooks};
use super::states::{MachineState, TransitionName};
use super::transitions::{Lifecycle, TransitionTable};
use crate::cache::CacheStore;
use crate::error::{ActionFailure, WorkflowError, WorkflowResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, Span};

/// Static shape and behavior of a concrete workflow
#[async_trait]
pub trait WorkflowDefinition: Send + Sync + 'static {
    type State: MachineState;
    type Transition: TransitionName;
    type Data: WorkflowData<State = Self::State>;
    type Args: Send + Sync;

    /// Name used in log messages
    fn name(&self) -> &'static str;

    fn transition_table(&self) -> TransitionTable<Self::State, Self::Transition>;

    /// Transition fired on creation to leave the `none` state
    fn init_transition(&self) -> Self::Transition;

    /// Transition into the terminal error state, legal from any state
    fn error_transition(&self) -> Self::Transition;

    /// Side effects of `transition`
    ///
    /// Also reachable without firing through
    /// [`PersistentStateMachine::invoke_handler`], in which case the state does
    /// not advance and no after-transition hook runs.
    async fn handle_transition(
        &self,
        transition: Self::Transition,
        context: &mut WorkflowContext<Self::Data>,
        args: Option<&Self::Args>,
    ) -> WorkflowResult<()>;
}

/// Hooks binding a definition to the context it persists
struct PersistenceHooks<'a, W: WorkflowDefinition> {
    definition: &'a W,
    context: &'a mut WorkflowContext<W::Data>,
}

#[async_trait]
impl<'a, W: WorkflowDefinition> TransitionHooks<W::State, W::Transition>
    for PersistenceHooks<'a, W>
{
    type Args = W::Args;
    type Error = WorkflowError;

    async fn on_transition(
        &mut self,
        lifecycle: &Lifecycle<W::State, W::Transition>,
        args: Option<&W::Args>,
    ) -> WorkflowResult<()> {
        self.definition
            .handle_transition(lifecycle.transition, self.context, args)
            .await
    }

    async fn after_transition(
        &mut self,
        lifecycle: &Lifecycle<W::State, W::Transition>,
    ) -> WorkflowResult<()> {
        self.context.data.set_current_state(lifecycle.to);
        self.context.persist().await?;

        info!(
            parent: self.context.span(),
            "State machine transitioned '{}': {} -> {}",
            lifecycle.transition,
            lifecycle.from,
            lifecycle.to
        );
        Ok(())
    }

    async fn on_error(
        &mut self,
        lifecycle: &Lifecycle<W::State, W::Transition>,
        error: &WorkflowError,
    ) {
        error!(
            parent: self.context.span(),
            transition = %lifecycle.transition,
            from = %lifecycle.from,
            error = %error,
            "State machine transition failed"
        );
    }
}

/// Cache-backed state machine for one workflow instance
pub struct PersistentStateMachine<W: WorkflowDefinition> {
    definition: W,
    machine: StateMachine<W::State, W::Transition>,
    context: WorkflowContext<W::Data>,
}

impl<W> std::fmt::Debug for PersistentStateMachine<W>
where
    W: WorkflowDefinition,
    W::Data: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStateMachine")
            .field("workflow", &self.definition.name())
            .field("state", &self.machine.state())
            .field("context", &self.context)
            .finish()
    }
}

impl<W: WorkflowDefinition> PersistentStateMachine<W> {
    /// Build a new machine in `none` and fire the init transition, persisting the result
    pub async fn create(
        definition: W,
        data: W::Data,
        cache_key: impl Into<String>,
        cache: Arc<dyn CacheStore>,
        span: Span,
    ) -> WorkflowResult<Self> {
        let machine = StateMachine::new(Arc::new(definition.transition_table()));
        let context = WorkflowContext::new(data, cache_key, cache, span);
        let mut psm = Self {
            definition,
            machine,
            context,
        };

        let init = psm.definition.init_transition();
        psm.fire(init, None).await?;
        Ok(psm)
    }

    /// Rebuild a machine from the snapshot stored under `cache_key`
    pub async fn load_from_cache(
        definition: W,
        cache_key: impl Into<String>,
        cache: Arc<dyn CacheStore>,
        span: Span,
    ) -> WorkflowResult<Self> {
        let cache_key = cache_key.into();
        let snapshot = cache
            .get(&cache_key)
            .await?
            .ok_or_else(|| WorkflowError::NotFound {
                key: cache_key.clone(),
            })?;

        let data: W::Data = serde_json::from_value(snapshot)?;
        let state = data.current_state().unwrap_or_default();
        let machine = StateMachine::with_state(Arc::new(definition.transition_table()), state);

        debug!(
            parent: &span,
            workflow = definition.name(),
            state = %state,
            "Loaded model from cache: {}",
            cache_key
        );

        Ok(Self {
            definition,
            machine,
            context: WorkflowContext::new(data, cache_key, cache, span),
        })
    }

    /// Fire `transition` through the engine with the persistence hooks
    pub async fn fire(
        &mut self,
        transition: W::Transition,
        args: Option<&W::Args>,
    ) -> WorkflowResult<W::State> {
        let mut hooks = PersistenceHooks {
            definition: &self.definition,
            context: &mut self.context,
        };
        self.machine.fire(transition, &mut hooks, args).await
    }

    /// Run the handler of `transition` without firing it
    pub async fn invoke_handler(
        &mut self,
        transition: W::Transition,
        args: Option<&W::Args>,
    ) -> WorkflowResult<()> {
        self.definition
            .handle_transition(transition, &mut self.context, args)
            .await
    }

    pub async fn persist(&self) -> WorkflowResult<()> {
        self.context.persist().await
    }

    /// Drive the machine into its error state after a failed action
    ///
    /// Returns `error` wrapped with `request_action_state`. If the error
    /// transition itself fails, that failure is logged and the original error
    /// is still the one returned.
    pub async fn capture_error(
        &mut self,
        error: WorkflowError,
        request_action_state: Value,
    ) -> WorkflowError {
        let transition = self.definition.error_transition();
        if let Err(transition_error) = self.fire(transition, None).await {
            error!(
                parent: self.context.span(),
                error = %transition_error,
                original_error = %error,
                "Failed to move {} into its error state",
                self.definition.name()
            );
        }

        WorkflowError::ActionFailed(Box::new(ActionFailure {
            source: error,
            request_action_state,
        }))
    }

    pub fn state(&self) -> W::State {
        self.machine.state()
    }

    pub fn machine(&self) -> &StateMachine<W::State, W::Transition> {
        &self.machine
    }

    pub fn definition(&self) -> &W {
        &self.definition
    }

    pub fn context(&self) -> &WorkflowContext<W::Data> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut WorkflowContext<W::Data> {
        &mut self.context
    }

    pub fn data(&self) -> &W::Data {
        &self.context.data
    }
}
