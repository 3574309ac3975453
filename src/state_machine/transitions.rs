//! Transition tables mapping (source state, transition) to a target state

use super::errors::{StateMachineError, StateMachineResult};
use super::states::{MachineState, TransitionName};
use std::collections::HashMap;

/// Source states a transition may be fired from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FromStates<S> {
    /// Legal from every state, including the pre-start marker
    Any,
    Only(Vec<S>),
}

impl<S: MachineState> FromStates<S> {
    pub fn contains(&self, state: S) -> bool {
        match self {
            Self::Any => true,
            Self::Only(states) => states.contains(&state),
        }
    }
}

/// Legal sources and target of one named transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionSpec<S> {
    pub from: FromStates<S>,
    pub to: S,
}

/// Transition being committed, handed to every lifecycle hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifecycle<S, T> {
    pub transition: T,
    pub from: S,
    pub to: S,
}

/// Static `{transition: {from, to}}` table of a workflow
#[derive(Debug, Clone)]
pub struct TransitionTable<S, T> {
    transitions: HashMap<T, TransitionSpec<S>>,
}

impl<S: MachineState, T: TransitionName> Default for TransitionTable<S, T> {
    fn default() -> Self {
        Self {
            transitions: HashMap::new(),
        }
    }
}

impl<S: MachineState, T: TransitionName> TransitionTable<S, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `transition` as legal from any of `from`
    #[must_use]
    pub fn with(mut self, transition: T, from: impl IntoIterator<Item = S>, to: S) -> Self {
        self.transitions.insert(
            transition,
            TransitionSpec {
                from: FromStates::Only(from.into_iter().collect()),
                to,
            },
        );
        self
    }

    /// Register `transition` as legal from every state
    #[must_use]
    pub fn with_from_any(mut self, transition: T, to: S) -> Self {
        self.transitions.insert(
            transition,
            TransitionSpec {
                from: FromStates::Any,
                to,
            },
        );
        self
    }

    pub fn spec(&self, transition: T) -> Option<&TransitionSpec<S>> {
        self.transitions.get(&transition)
    }

    /// Resolve the target of firing `transition` while in `from`
    pub fn target(&self, from: S, transition: T) -> StateMachineResult<S> {
        let spec = self
            .spec(transition)
            .ok_or_else(|| StateMachineError::UnknownTransition {
                transition: transition.to_string(),
            })?;

        if !spec.from.contains(from) {
            return Err(StateMachineError::InvalidTransition {
                from: from.to_string(),
                transition: transition.to_string(),
            });
        }

        Ok(spec.to)
    }

    pub fn can(&self, from: S, transition: T) -> bool {
        self.target(from, transition).is_ok()
    }

    /// Transitions legal from `from`, in no particular order
    pub fn available(&self, from: S) -> Vec<T> {
        self.transitions
            .iter()
            .filter(|(_, spec)| spec.from.contains(from))
            .map(|(transition, _)| *transition)
            .collect()
    }
}
