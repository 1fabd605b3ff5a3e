//! Logging helpers for graph execution.

/// Log node execution start.
pub fn log_node_start(node_id: &str, step: usize) {
    tracing::debug!(node_id = node_id, step = step, "Starting node execution");
}

/// Log node execution completion with the resolved next node.
pub fn log_node_complete(node_id: &str, next: &str) {
    tracing::debug!(node_id = node_id, next = next, "Node execution complete");
}

/// Log graph execution start.
pub fn log_graph_start(first_node: &str) {
    tracing::info!(first_node = first_node, "Starting graph execution");
}

/// Log graph execution completion.
pub fn log_graph_complete(steps: usize) {
    tracing::info!(steps = steps, "Graph execution complete");
}

/// Log graph execution error.
pub fn log_graph_error(error: &crate::error::AgentError) {
    tracing::error!(%error, "Graph execution error");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_functions_do_not_panic() {
        log_node_start("think", 1);
        log_node_complete("think", "act");
        log_graph_start("think");
        log_graph_complete(3);
        log_graph_error(&crate::error::AgentError::ExecutionFailed(
            "test".to_string(),
        ));
    }
}
