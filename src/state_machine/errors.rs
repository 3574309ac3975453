use thiserror::Error;

/// Error types for state machine engine operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateMachineError {
    #[error("Invalid state transition '{transition}' from state '{from}'")]
    InvalidTransition { from: String, transition: String },

    #[error("Unknown transition '{transition}'")]
    UnknownTransition { transition: String },
}

/// Result type alias for state machine operations
pub type StateMachineResult<T> = Result<T, StateMachineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StateMachineError::InvalidTransition {
            from: "succeeded".to_string(),
            transition: "requestAction".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid state transition 'requestAction' from state 'succeeded'"
        );

        let err = StateMachineError::UnknownTransition {
            transition: "refund".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown transition 'refund'");
    }
}
