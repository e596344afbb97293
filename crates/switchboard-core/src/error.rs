//! Error types for Switchboard Core
//!
//! Errors a workflow run can end with. Configuration problems are reported
//! separately as [`ConfigError`](crate::config::ConfigError), before any run
//! starts.

use crate::llm::LlmError;
use thiserror::Error;

/// Result type for Switchboard Core operations
pub type Result<T> = std::result::Result<T, SwitchboardError>;

/// Unified error type for a workflow run
#[derive(Error, Debug)]
pub enum SwitchboardError {
    /// The model invoker failed, or returned a value outside its contract
    #[error("Model invocation failed: {0}")]
    ModelInvocation(#[from] LlmError),

    /// Workflow reached a state the graph does not allow
    #[error("Invalid workflow transition: {0}")]
    InvalidTransition(String),
}

impl SwitchboardError {
    /// Create an invalid transition error
    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        SwitchboardError::InvalidTransition(msg.into())
    }

    /// Whether this error came from the model provider side of the boundary.
    ///
    /// Schema violations count as invocation failures.
    pub fn is_model_failure(&self) -> bool {
        matches!(self, SwitchboardError::ModelInvocation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_llm_errors_become_model_failures() {
        let err: SwitchboardError = LlmError::SchemaViolation("next".to_string()).into();
        assert!(err.is_model_failure());
        assert!(err.to_string().starts_with("Model invocation failed"));
    }

    #[test]
    fn test_invalid_transition_is_not_a_model_failure() {
        let err = SwitchboardError::invalid_transition("terminated");
        assert!(!err.is_model_failure());
        assert_eq!(err.to_string(), "Invalid workflow transition: terminated");
    }
}
