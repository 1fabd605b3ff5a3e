//! Invoke config: thread_id, user_id, customer_id, recursion_limit.
//!
//! Used by `CompiledStateGraph::invoke` and `Checkpointer`.

/// Node executions allowed per invoke when the caller does not override it.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// Config for a single invoke.
///
/// **Interaction**: Passed to `CompiledStateGraph::invoke(state, config)` and
/// `Checkpointer::put` / `get`; copied into `RunContext` so nodes can read it.
#[derive(Debug, Clone)]
pub struct RunnableConfig {
    /// Unique id for this conversation/thread. Required when using a checkpointer.
    pub thread_id: Option<String>,
    /// Optional user id; forwarded to tools through `ToolCallContext`.
    pub user_id: Option<String>,
    /// Verified customer id supplied by the caller (e.g. the HTTP request).
    pub customer_id: Option<String>,
    /// Maximum node executions before `AgentError::RecursionLimit`.
    pub recursion_limit: usize,
}

impl Default for RunnableConfig {
    fn default() -> Self {
        Self {
            thread_id: None,
            user_id: None,
            customer_id: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl RunnableConfig {
    /// Config bound to a thread.
    pub fn for_thread(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: Some(thread_id.into()),
            ..Self::default()
        }
    }
}
