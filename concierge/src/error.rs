//! Agent execution error types.
//!
//! Returned by `Node::run`, `CompiledStateGraph::invoke` and the runners built on top of them.

use thiserror::Error;

/// Agent execution error.
///
/// Returned when a graph step fails. Tool and LLM failures are folded into
/// `ExecutionFailed`; the step limit has its own variant so callers can tell
/// a runaway loop apart from a provider error.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. LLM call failed, tool error).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The graph ran more node steps than `RunnableConfig::recursion_limit` allows.
    #[error("recursion limit of {limit} steps reached without hitting END")]
    RecursionLimit { limit: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display format of ExecutionFailed contains "execution failed" and the message.
    #[test]
    fn agent_error_display_execution_failed() {
        let err = AgentError::ExecutionFailed("msg".to_string());
        let s = err.to_string();
        assert!(
            s.contains("execution failed"),
            "Display should contain 'execution failed': {}",
            s
        );
        assert!(s.contains("msg"), "Display should contain message: {}", s);
    }

    /// **Scenario**: Display of RecursionLimit names the limit.
    #[test]
    fn agent_error_display_recursion_limit() {
        let err = AgentError::RecursionLimit { limit: 25 };
        let s = err.to_string();
        assert!(s.contains("recursion limit"), "{}", s);
        assert!(s.contains("25"), "{}", s);
    }
}
