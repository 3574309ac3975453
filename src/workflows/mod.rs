//! # Workflows
//!
//! Concrete request/reply workflows built on the persistent state machine.
//! Each kind differs only in its entity, identifier field and outbound verb.

pub mod action_workflow;
pub mod kinds;
pub mod states;

pub use action_workflow::{ActionArgs, ActionData, ActionDefinition, ActionWorkflow, RunStep};
pub use kinds::{ActionKind, PartyLookupAction, QuoteAction, SendFuture, TransferAction};
pub use states::{response_for, ActionResponseState, ActionState, ActionTransition};

/// Transfer execution workflow (`transfers-<transferId>`)
pub type TransferWorkflow = ActionWorkflow<TransferAction>;

/// Quotation workflow (`quotes-<quoteId>`)
pub type QuoteWorkflow = ActionWorkflow<QuoteAction>;

/// Party lookup workflow (`parties-<partyId>`)
pub type PartyLookupWorkflow = ActionWorkflow<PartyLookupAction>;
