//! Compiled state graph: immutable, supports invoke only.
//!
//! Built by `StateGraph::compile` or `compile_with_checkpointer`. When a checkpointer
//! is set and `config.thread_id` is provided, the final state is saved after invoke.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::error::AgentError;
use crate::memory::{Checkpoint, Checkpointer, RunnableConfig};

use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
};
use super::state_graph::END;
use super::{Next, NextEntry, Node, RunContext};

/// Compiled graph: immutable structure, supports invoke only.
///
/// Runs from the first node; uses the conditional router (when present) or each
/// node's returned `Next` to choose the next node. Every node execution counts
/// against `RunnableConfig::recursion_limit`.
#[derive(Clone)]
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) first_node_id: String,
    pub(super) next_map: HashMap<String, NextEntry<S>>,
    pub(super) checkpointer: Option<Arc<dyn Checkpointer<S>>>,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Runs the graph with the given state until END.
    ///
    /// - `Next::Continue`: follow the outgoing edge, or end if there is none.
    /// - `Next::Node(id)`: run the node with that id next.
    /// - `Next::End`: stop and return current state.
    ///
    /// Returns `AgentError::RecursionLimit` when more than `config.recursion_limit`
    /// nodes run without reaching END.
    pub async fn invoke(&self, state: S, config: Option<RunnableConfig>) -> Result<S, AgentError> {
        let config = config.unwrap_or_default();
        let run_ctx = RunContext::new(config);
        match self.run_loop(state, &run_ctx).await {
            Ok(state) => Ok(state),
            Err(e) => {
                log_graph_error(&e);
                Err(e)
            }
        }
    }

    async fn run_loop(&self, mut state: S, run_ctx: &RunContext) -> Result<S, AgentError> {
        let limit = run_ctx.config.recursion_limit;
        let mut current_id = self.first_node_id.clone();
        let mut steps = 0usize;
        log_graph_start(&current_id);

        loop {
            if steps >= limit {
                return Err(AgentError::RecursionLimit { limit });
            }
            steps += 1;

            let node = self.nodes.get(&current_id).cloned().ok_or_else(|| {
                AgentError::ExecutionFailed(format!("unknown node: {}", current_id))
            })?;
            log_node_start(&current_id, steps);
            let (new_state, next) = node.run_with_context(state, run_ctx).await?;
            state = new_state;

            let next_id = match self.next_map.get(&current_id) {
                Some(NextEntry::Conditional(router)) => Some(router.resolve_next(&state)),
                entry => match next {
                    Next::End => None,
                    Next::Node(id) => Some(id),
                    Next::Continue => match entry {
                        Some(NextEntry::Unconditional(id)) => Some(id.clone()),
                        _ => None,
                    },
                },
            };
            log_node_complete(&current_id, next_id.as_deref().unwrap_or(END));

            match next_id {
                Some(id) if id != END => current_id = id,
                _ => break,
            }
        }

        self.save_checkpoint(&state, &run_ctx.config).await;
        log_graph_complete(steps);
        Ok(state)
    }

    async fn save_checkpoint(&self, state: &S, config: &RunnableConfig) {
        let (Some(cp), Some(_)) = (&self.checkpointer, config.thread_id.as_ref()) else {
            return;
        };
        let checkpoint = Checkpoint::from_state(state.clone());
        if let Err(e) = cp.put(config, &checkpoint).await {
            tracing::warn!(error = %e, "failed to save checkpoint");
        }
    }

    /// Checkpointer attached at compile time, if any.
    pub fn checkpointer(&self) -> Option<&Arc<dyn Checkpointer<S>>> {
        self.checkpointer.as_ref()
    }
}
