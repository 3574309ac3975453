use crate::state_machine::MachineState;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Machine states of a request/reply workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionState {
    /// Pre-start marker, left by the init transition on creation
    #[default]
    None,
    /// Created and waiting for the action to be requested
    Start,
    /// The correlated reply arrived
    Succeeded,
    /// Terminal error state
    Errored,
}

impl ActionState {
    pub const ALL: [ActionState; 4] = [Self::None, Self::Start, Self::Succeeded, Self::Errored];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Start => "start",
            Self::Succeeded => "succeeded",
            Self::Errored => "errored",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Errored)
    }
}

impl fmt::Display for ActionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "start" => Ok(Self::Start),
            "succeeded" => Ok(Self::Succeeded),
            "errored" => Ok(Self::Errored),
            _ => Err(format!("Invalid action state: {s}")),
        }
    }
}

impl MachineState for ActionState {}

/// Transitions of a request/reply workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionTransition {
    /// none -> start
    Init,
    /// start -> succeeded
    RequestAction,
    /// any -> errored
    Error,
}

impl fmt::Display for ActionTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::RequestAction => "requestAction",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Externally visible status reported by `get_response`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionResponseState {
    WaitingForActionRequest,
    Completed,
    ErrorOccurred,
}

impl ActionResponseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WaitingForActionRequest => "WAITING_FOR_ACTION_REQUEST",
            Self::Completed => "COMPLETED",
            Self::ErrorOccurred => "ERROR_OCCURRED",
        }
    }
}

impl fmt::Display for ActionResponseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response table; `none` has no entry
pub fn response_for(state: ActionState) -> Option<ActionResponseState> {
    match state {
        ActionState::None => None,
        ActionState::Start => Some(ActionResponseState::WaitingForActionRequest),
        ActionState::Succeeded => Some(ActionResponseState::Completed),
        ActionState::Errored => Some(ActionResponseState::ErrorOccurred),
    }
}
