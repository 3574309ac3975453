//! Generic finite-state machine engine
//!
//! The engine owns transition legality and the authoritative current state.
//! Everything else (side effects, persistence, logging) happens in
//! [`TransitionHooks`] supplied by the caller of [`StateMachine::fire`].

use super::errors::StateMachineError;
use super::states::{MachineState, TransitionName};
use super::transitions::{Lifecycle, TransitionTable};
use async_trait::async_trait;
use std::sync::Arc;

/// Lifecycle callbacks invoked around a fired transition
///
/// Only `on_transition` (the transition handler) is required.
#[async_trait]
pub trait TransitionHooks<S: MachineState, T: TransitionName>: Send {
    type Args: Send + Sync + ?Sized;
    type Error: From<StateMachineError> + Send + Sync;

    async fn before_transition(&mut self, _lifecycle: &Lifecycle<S, T>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handler registered for the transition; runs before the state advances
    async fn on_transition(
        &mut self,
        lifecycle: &Lifecycle<S, T>,
        args: Option<&Self::Args>,
    ) -> Result<(), Self::Error>;

    /// Runs once the state has advanced to `lifecycle.to`
    async fn after_transition(&mut self, _lifecycle: &Lifecycle<S, T>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Observes a failed `before_transition` or `on_transition`
    async fn on_error(&mut self, _lifecycle: &Lifecycle<S, T>, _error: &Self::Error) {}
}

/// Finite-state machine instance over a shared transition table
#[derive(Debug, Clone)]
pub struct StateMachine<S, T> {
    state: S,
    table: Arc<TransitionTable<S, T>>,
}

impl<S: MachineState, T: TransitionName> StateMachine<S, T> {
    /// Create a machine in the pre-start `none` state
    pub fn new(table: Arc<TransitionTable<S, T>>) -> Self {
        Self::with_state(table, S::default())
    }

    /// Create a machine already in `state`, without firing anything
    pub fn with_state(table: Arc<TransitionTable<S, T>>, state: S) -> Self {
        Self { state, table }
    }

    pub fn state(&self) -> S {
        self.state
    }

    pub fn table(&self) -> &TransitionTable<S, T> {
        &self.table
    }

    pub fn can(&self, transition: T) -> bool {
        self.table.can(self.state, transition)
    }

    /// Fire `transition`, running the hooks in order
    ///
    /// Legality is checked first; an illegal transition never reaches any hook.
    /// If `before_transition` or the handler fails, `on_error` observes the error,
    /// the state is left unchanged and the error is returned. Only after the
    /// handler succeeds does the state advance and `after_transition` run.
    pub async fn fire<H>(
        &mut self,
        transition: T,
        hooks: &mut H,
        args: Option<&H::Args>,
    ) -> Result<S, H::Error>
    where
        H: TransitionHooks<S, T>,
    {
        let to = self.table.target(self.state, transition)?;
        let lifecycle = Lifecycle {
            transition,
            from: self.state,
            to,
        };

        if let Err(error) = hooks.before_transition(&lifecycle).await {
            hooks.on_error(&lifecycle, &error).await;
            return Err(error);
        }

        if let Err(error) = hooks.on_transition(&lifecycle, args).await {
            hooks.on_error(&lifecycle, &error).await;
            return Err(error);
        }

        self.state = to;
        hooks.after_transition(&lifecycle).await?;
        Ok(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use thiserror::Error;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    enum Phase {
        #[default]
        None,
        Start,
        Done,
    }

    impl fmt::Display for Phase {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&format!("{self:?}").to_lowercase())
        }
    }

    impl MachineState for Phase {}

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Step {
        Init,
        Finish,
    }

    impl fmt::Display for Step {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&format!("{self:?}").to_lowercase())
        }
    }

    #[derive(Debug, Error, PartialEq)]
    enum TestError {
        #[error(transparent)]
        Machine(#[from] StateMachineError),
        #[error("handler failed: {0}")]
        Handler(String),
    }

    #[derive(Default)]
    struct RecordingHooks {
        calls: Vec<String>,
        fail_handler: bool,
    }

    #[async_trait]
    impl TransitionHooks<Phase, Step> for RecordingHooks {
        type Args = str;
        type Error = TestError;

        async fn before_transition(
            &mut self,
            lifecycle: &Lifecycle<Phase, Step>,
        ) -> Result<(), TestError> {
            self.calls.push(format!("before:{}", lifecycle.transition));
            Ok(())
        }

        async fn on_transition(
            &mut self,
            lifecycle: &Lifecycle<Phase, Step>,
            args: Option<&str>,
        ) -> Result<(), TestError> {
            self.calls
                .push(format!("handle:{}:{}", lifecycle.transition, args.unwrap_or("-")));
            if self.fail_handler {
                return Err(TestError::Handler("boom".to_string()));
            }
            Ok(())
        }

        async fn after_transition(
            &mut self,
            lifecycle: &Lifecycle<Phase, Step>,
        ) -> Result<(), TestError> {
            self.calls
                .push(format!("after:{}->{}", lifecycle.from, lifecycle.to));
            Ok(())
        }

        async fn on_error(&mut self, lifecycle: &Lifecycle<Phase, Step>, error: &TestError) {
            self.calls
                .push(format!("error:{}:{}", lifecycle.transition, error));
        }
    }

    fn machine() -> StateMachine<Phase, Step> {
        let table = TransitionTable::new()
            .with(Step::Init, [Phase::None], Phase::Start)
            .with(Step::Finish, [Phase::Start], Phase::Done);
        StateMachine::new(Arc::new(table))
    }

    #[tokio::test]
    async fn test_fire_runs_hooks_in_order() {
        let mut sm = machine();
        let mut hooks = RecordingHooks::default();

        assert_eq!(sm.state(), Phase::None);
        let to = sm.fire(Step::Init, &mut hooks, Some("payload")).await.unwrap();

        assert_eq!(to, Phase::Start);
        assert_eq!(sm.state(), Phase::Start);
        assert_eq!(
            hooks.calls,
            vec!["before:init", "handle:init:payload", "after:none->start"]
        );
    }

    #[tokio::test]
    async fn test_handler_failure_keeps_state() {
        let mut sm = machine();
        let mut hooks = RecordingHooks::default();
        sm.fire(Step::Init, &mut hooks, None).await.unwrap();

        hooks.fail_handler = true;
        hooks.calls.clear();
        let err = sm.fire(Step::Finish, &mut hooks, None).await.unwrap_err();

        assert_eq!(err, TestError::Handler("boom".to_string()));
        assert_eq!(sm.state(), Phase::Start);
        assert_eq!(
            hooks.calls,
            vec![
                "before:finish",
                "handle:finish:-",
                "error:finish:handler failed: boom"
            ]
        );
    }

    #[tokio::test]
    async fn test_illegal_transition_skips_hooks() {
        let mut sm = machine();
        let mut hooks = RecordingHooks::default();

        let err = sm.fire(Step::Finish, &mut hooks, None).await.unwrap_err();

        assert_eq!(
            err,
            TestError::Machine(StateMachineError::InvalidTransition {
                from: "none".to_string(),
                transition: "finish".to_string(),
            })
        );
        assert!(hooks.calls.is_empty());
        assert_eq!(sm.state(), Phase::None);
    }

    #[test]
    fn test_with_state_does_not_fire() {
        let table = Arc::new(TransitionTable::new().with(Step::Finish, [Phase::Start], Phase::Done));
        let sm = StateMachine::with_state(table, Phase::Start);

        assert_eq!(sm.state(), Phase::Start);
        assert!(sm.can(Step::Finish));
        assert!(!sm.can(Step::Init));
    }
}
