//! Run context passed into nodes.
//!
//! Built once per `invoke` from the caller's `RunnableConfig`. Nodes that need
//! per-run identifiers (ActNode forwards them to tools) read them from here.

use crate::memory::RunnableConfig;

/// Per-invoke context handed to `Node::run_with_context`.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Config for the current run (thread_id, user_id, customer_id, recursion_limit).
    pub config: RunnableConfig,
}

impl RunContext {
    pub fn new(config: RunnableConfig) -> Self {
        Self { config }
    }
}
