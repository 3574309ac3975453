//! # Request/Reply Workflow
//!
//! A persistent state machine that issues one outbound request and completes
//! when the correlated reply is published on `"<entity>-<id>"`.
//!
//! ```text
//! none --init--> start --requestAction--> succeeded
//!   \______________\________error________> errored
//! ```
//!
//! `run` is the driving entry point. Dispatch is an explicit mapping from the
//! machine state to a [`RunStep`]; an action failure is recovered on the `Err`
//! branch by firing `error`, and the original error is returned to the caller
//! with the pre-error data attached.

use super::kinds::ActionKind;
use super::states::{response_for, ActionResponseState, ActionState, ActionTransition};
use crate::client::SwitchClient;
use crate::config::WorkflowConfig;
use crate::correlation::DeferredJob;
use crate::error::WorkflowResult;
use crate::logging::log_workflow_operation;
use crate::state_machine::{
    PersistentStateMachine, TransitionTable, WorkflowContext, WorkflowData, WorkflowDefinition,
};
use crate::validation::{
    require_identifier, require_matching_identifier, require_nonempty_if_present,
    validate_request_payload,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, info_span, Span};

/// Routing field carrying the destination participant
pub const FSP_ID_FIELD: &str = "fspId";

/// Arguments of `run` and of the request action
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionArgs {
    /// Domain identifier the channel and cache key derive from
    pub id: Option<String>,
    /// Destination participant
    pub fsp_id: Option<String>,
    /// Outbound request body
    pub payload: Option<Value>,
}

impl ActionArgs {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_fsp_id(mut self, fsp_id: impl Into<String>) -> Self {
        self.fsp_id = Some(fsp_id.into());
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Read arguments shaped like `{"transferId": .., "fspId": .., "transfer": {..}}`
    ///
    /// Identifier and routing fields are only picked up when they are strings.
    pub fn from_json<K: ActionKind>(value: &Value) -> Self {
        let string_field = |field: &str| value.get(field).and_then(Value::as_str).map(str::to_owned);

        Self {
            id: string_field(K::ID_FIELD),
            fsp_id: string_field(FSP_ID_FIELD),
            payload: value.get(K::PAYLOAD_FIELD).cloned(),
        }
    }
}

/// Persisted data of a request/reply workflow
///
/// Fields other than `currentState` are opaque and kept as-is, including the
/// reply merged in under the kind's reply key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_state: Option<ActionState>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Key of the status field inside the serialized snapshot
const CURRENT_STATE_FIELD: &str = "currentState";

impl ActionData {
    /// Wrap caller data. A `currentState` entry is discarded since the status
    /// is only ever set by the machine.
    pub fn new(mut fields: Map<String, Value>) -> Self {
        fields.remove(CURRENT_STATE_FIELD);
        Self {
            current_state: None,
            fields,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl WorkflowData for ActionData {
    type State = ActionState;

    fn current_state(&self) -> Option<ActionState> {
        self.current_state
    }

    fn set_current_state(&mut self, state: ActionState) {
        self.fields.remove(CURRENT_STATE_FIELD);
        self.current_state = Some(state);
    }
}

/// What `run` does in a given machine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStep {
    RequestAction,
    Respond,
    Errored,
}

impl RunStep {
    /// `none` maps to the action as well; the engine then rejects the
    /// illegal `requestAction` and the failure is captured like any other.
    pub fn for_state(state: ActionState) -> Self {
        match state {
            ActionState::None | ActionState::Start => Self::RequestAction,
            ActionState::Succeeded => Self::Respond,
            ActionState::Errored => Self::Errored,
        }
    }
}

/// Transition table and handlers of a request/reply workflow of kind `K`
pub struct ActionDefinition<K> {
    client: Arc<dyn SwitchClient>,
    timeout: Duration,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ActionKind> ActionDefinition<K> {
    pub fn new(config: &WorkflowConfig) -> Self {
        Self {
            client: config.client.clone(),
            timeout: config.request_processing_timeout,
            _kind: PhantomData,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Send the outbound request and wait for its correlated reply
    async fn request_action(
        &self,
        context: &mut WorkflowContext<ActionData>,
        args: Option<&ActionArgs>,
    ) -> WorkflowResult<()> {
        let args = args.cloned().unwrap_or_default();
        let channel = ActionWorkflow::<K>::channel_name(&args);
        let payload = args.payload.unwrap_or_default();

        debug!(
            parent: context.span(),
            channel = %channel,
            destination = args.fsp_id.as_deref(),
            "Requesting {} action",
            K::NAME
        );

        let reply = DeferredJob::listen_on(context.cache().clone(), channel)
            .send_and_wait(
                K::send(self.client.as_ref(), &payload, args.fsp_id.as_deref()),
                self.timeout,
            )
            .await?;

        context.data.fields.insert(K::REPLY_KEY.to_string(), reply);
        Ok(())
    }
}

#[async_trait]
impl<K: ActionKind> WorkflowDefinition for ActionDefinition<K> {
    type State = ActionState;
    type Transition = ActionTransition;
    type Data = ActionData;
    type Args = ActionArgs;

    fn name(&self) -> &'static str {
        K::NAME
    }

    fn transition_table(&self) -> TransitionTable<ActionState, ActionTransition> {
        TransitionTable::new()
            .with(ActionTransition::Init, [ActionState::None], ActionState::Start)
            .with(
                ActionTransition::RequestAction,
                [ActionState::Start],
                ActionState::Succeeded,
            )
            .with_from_any(ActionTransition::Error, ActionState::Errored)
    }

    fn init_transition(&self) -> ActionTransition {
        ActionTransition::Init
    }

    fn error_transition(&self) -> ActionTransition {
        ActionTransition::Error
    }

    async fn handle_transition(
        &self,
        transition: ActionTransition,
        context: &mut WorkflowContext<ActionData>,
        args: Option<&ActionArgs>,
    ) -> WorkflowResult<()> {
        match transition {
            ActionTransition::RequestAction => self.request_action(context, args).await,
            ActionTransition::Init | ActionTransition::Error => Ok(()),
        }
    }
}

/// Cache-backed request/reply workflow of kind `K`
pub struct ActionWorkflow<K: ActionKind> {
    machine: PersistentStateMachine<ActionDefinition<K>>,
}

impl<K: ActionKind> std::fmt::Debug for ActionWorkflow<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionWorkflow")
            .field("machine", &self.machine)
            .finish()
    }
}

impl<K: ActionKind> ActionWorkflow<K> {
    /// Create a workflow under `cache_key` and fire `init`
    pub async fn create(
        initial_data: ActionData,
        cache_key: impl Into<String>,
        config: &WorkflowConfig,
    ) -> WorkflowResult<Self> {
        let cache_key = cache_key.into();
        let span = Self::workflow_span(&cache_key, config);
        let machine = PersistentStateMachine::create(
            ActionDefinition::new(config),
            initial_data,
            cache_key,
            config.cache.clone(),
            span,
        )
        .await?;

        Ok(Self { machine })
    }

    /// Rebuild a workflow from the snapshot under `cache_key`
    pub async fn load_from_cache(
        cache_key: impl Into<String>,
        config: &WorkflowConfig,
    ) -> WorkflowResult<Self> {
        let cache_key = cache_key.into();
        let span = Self::workflow_span(&cache_key, config);
        let machine = PersistentStateMachine::load_from_cache(
            ActionDefinition::new(config),
            cache_key,
            config.cache.clone(),
            span,
        )
        .await?;

        Ok(Self { machine })
    }

    fn workflow_span(cache_key: &str, config: &WorkflowConfig) -> Span {
        info_span!(
            "workflow",
            workflow = K::NAME,
            cache_key = %cache_key,
            dfsp_id = %config.dfsp_id
        )
    }

    /// Correlation channel for `args`; never fails
    pub fn channel_name(args: &ActionArgs) -> String {
        format!("{}-{}", K::ENTITY, args.id.as_deref().unwrap_or("undefined"))
    }

    /// Cache key for `args`; the identifier is mandatory
    pub fn generate_key(args: &ActionArgs) -> WorkflowResult<String> {
        require_identifier(K::ID_FIELD, args.id.as_deref())?;
        Ok(format!("key-{}", Self::channel_name(args)))
    }

    /// Validate `run` arguments without touching any state
    pub fn validate_args(args: &ActionArgs) -> WorkflowResult<()> {
        let id = require_identifier(K::ID_FIELD, args.id.as_deref())?;
        require_matching_identifier(K::ID_FIELD, id, args.payload.as_ref())?;
        require_nonempty_if_present(FSP_ID_FIELD, args.fsp_id.as_deref())?;
        if let Some(payload) = &args.payload {
            validate_request_payload(payload)?;
        }
        Ok(())
    }

    /// Run the request action handler without firing `requestAction`
    ///
    /// The reply is merged into the data, but the machine state and
    /// `currentState` stay where they were and nothing is persisted.
    pub async fn request_action_handler(&mut self, args: &ActionArgs) -> WorkflowResult<()> {
        self.machine
            .invoke_handler(ActionTransition::RequestAction, Some(args))
            .await
    }

    /// Externally visible status for the data's current state
    pub fn get_response(&self) -> ActionResponseState {
        let current = self.data().current_state;
        if let Some(response) = current.and_then(response_for) {
            return response;
        }

        let shown = current.map_or_else(|| "undefined".to_string(), |state| state.to_string());
        error!(
            parent: self.span(),
            "{} response being returned from an unexpected state: {}. Returning ERROR_OCCURRED state",
            K::NAME,
            shown
        );
        ActionResponseState::ErrorOccurred
    }

    /// Drive the workflow one step
    ///
    /// Returns `Ok(None)` when the workflow is already in its error state.
    pub async fn run(&mut self, args: &ActionArgs) -> WorkflowResult<Option<ActionResponseState>> {
        Self::validate_args(args)?;
        let span = self.span().clone();

        match RunStep::for_state(self.state()) {
            RunStep::RequestAction => {
                if let Err(error) = self
                    .machine
                    .fire(ActionTransition::RequestAction, Some(args))
                    .await
                {
                    let snapshot = self.request_action_state();
                    return Err(self.machine.capture_error(error, snapshot).await);
                }
                info!(parent: &span, "Action called successfully");

                self.machine.persist().await?;
                info!(parent: &span, "Persisted model in cache: {}", self.cache_key());

                let response = self.get_response();
                log_workflow_operation(&span, "run", K::NAME, response.as_str(), None);
                Ok(Some(response))
            }
            RunStep::Respond => {
                info!(parent: &span, "Action called successfully");
                Ok(Some(self.get_response()))
            }
            RunStep::Errored => {
                info!(parent: &span, "State machine in errored state");
                Ok(None)
            }
        }
    }

    /// Current data with the `ERROR_OCCURRED` marker as its status
    fn request_action_state(&self) -> Value {
        let mut snapshot = match serde_json::to_value(self.data()) {
            Ok(Value::Object(map)) => map,
            _ => self.data().fields.clone(),
        };
        snapshot.insert(
            CURRENT_STATE_FIELD.to_string(),
            Value::String(ActionResponseState::ErrorOccurred.as_str().to_string()),
        );
        Value::Object(snapshot)
    }

    pub fn state(&self) -> ActionState {
        self.machine.state()
    }

    pub fn data(&self) -> &ActionData {
        self.machine.data()
    }

    pub fn data_mut(&mut self) -> &mut ActionData {
        &mut self.machine.context_mut().data
    }

    pub fn cache_key(&self) -> &str {
        self.machine.context().cache_key()
    }

    pub fn context(&self) -> &WorkflowContext<ActionData> {
        self.machine.context()
    }

    pub fn machine(&self) -> &PersistentStateMachine<ActionDefinition<K>> {
        &self.machine
    }

    pub fn span(&self) -> &Span {
        self.machine.context().span()
    }
}
