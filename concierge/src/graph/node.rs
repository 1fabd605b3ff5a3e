//! Graph node trait: one step in a StateGraph.
//!
//! Receives state `S`, returns updated `S` and `Next` (continue, jump, or end).

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::AgentError;

use super::{Next, RunContext};

/// One step in a graph: state in, (state out, next step).
///
/// **Interaction**: Registered via `StateGraph::add_node`; driven by `CompiledStateGraph::invoke`.
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Node id (e.g. `"think"`, `"act"`). Must be unique within a graph.
    fn id(&self) -> &str;

    /// One step: state in, (state out, next step).
    async fn run(&self, state: S) -> Result<(S, Next), AgentError>;

    /// Variant with run context (thread, user and customer ids from config).
    ///
    /// Default implementation calls `run` and ignores the context.
    async fn run_with_context(&self, state: S, _ctx: &RunContext) -> Result<(S, Next), AgentError> {
        self.run(state).await
    }
}
