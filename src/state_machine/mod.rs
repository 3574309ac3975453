// State machine module for workflow execution
//
// A generic FSM engine (legal transitions plus lifecycle hooks) and the
// persistent wrapper that snapshots workflow data to the cache after every
// committed transition.

pub mod context;
pub mod engine;
pub mod errors;
pub mod persistence;
pub mod states;
pub mod transitions;

// Re-export main types for convenient access
pub use context::{WorkflowContext, WorkflowData};
pub use engine::{StateMachine, TransitionHooks};
pub use errors::{StateMachineError, StateMachineResult};
pub use persistence::{PersistentStateMachine, WorkflowDefinition};
pub use states::{MachineState, TransitionName};
pub use transitions::{FromStates, Lifecycle, TransitionSpec, TransitionTable};
