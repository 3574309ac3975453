#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Switch Adapter Core
//!
//! Orchestration core of a payment-switch adapter: persistent, cache-backed
//! state machines whose transitions can send an outbound request and then
//! suspend until the correlated reply is published on a cache channel.
//!
//! ## Architecture
//!
//! ```text
//! ActionWorkflow<K>            create / load_from_cache / run / get_response
//!   └── PersistentStateMachine snapshot to cache after every committed transition
//!         └── StateMachine     transition legality + lifecycle hooks
//! DeferredJob                  subscribe -> send -> await reply | timeout -> unsubscribe
//! CacheStore                   get / set / publish / subscribe / unsubscribe
//! ```
//!
//! ## Module Organization
//!
//! - [`cache`] - Cache store trait and the in-memory provider
//! - [`client`] - Outbound switch client interface
//! - [`correlation`] - One-shot request/reply over publish/subscribe
//! - [`state_machine`] - FSM engine and its persistent wrapper
//! - [`workflows`] - Transfer, quote and party lookup workflows
//! - [`validation`] - `run` argument validation
//! - [`config`] - Layered configuration and workflow runtime handles
//! - [`error`] - Workflow error taxonomy
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use switch_adapter_core::cache::InMemoryCache;
//! use switch_adapter_core::client::SwitchClient;
//! use switch_adapter_core::config::{AdapterConfig, WorkflowConfig};
//! use switch_adapter_core::workflows::{ActionArgs, ActionData, TransferWorkflow};
//!
//! # async fn example(client: Arc<dyn SwitchClient>) -> Result<(), Box<dyn std::error::Error>> {
//! let adapter = AdapterConfig::load(None)?;
//! let config = WorkflowConfig::new(Arc::new(InMemoryCache::new()), client, &adapter);
//!
//! let args = ActionArgs::new()
//!     .with_id("b51ec534-ee48-4575-b6a9-ead2955b8069")
//!     .with_fsp_id("payeefsp")
//!     .with_payload(serde_json::json!({"amount": "100", "currency": "USD"}));
//!
//! let key = TransferWorkflow::generate_key(&args)?;
//! let mut workflow = TransferWorkflow::create(ActionData::default(), key, &config).await?;
//! let response = workflow.run(&args).await?;
//! println!("transfer status: {response:?}");
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod correlation;
pub mod error;
pub mod logging;
pub mod state_machine;
pub mod validation;
pub mod workflows;

pub use cache::{CacheError, CacheStore, InMemoryCache};
pub use client::{ClientError, SwitchClient};
pub use config::{AdapterConfig, ConfigError, LoggingConfig, WorkflowConfig};
pub use correlation::{CorrelationError, DeferredJob};
pub use error::{ActionFailure, WorkflowError, WorkflowResult};
pub use logging::init_structured_logging;
pub use state_machine::{PersistentStateMachine, StateMachine, StateMachineError};
pub use workflows::{
    ActionArgs, ActionData, ActionResponseState, ActionState, ActionWorkflow, PartyLookupWorkflow,
    QuoteWorkflow, TransferWorkflow,
};
