//! Context passed into tool calls for the current step.
//!
//! ActNode builds one per round from the state and the run config and passes it to
//! `ToolSource::call_tool_with_context`.

use crate::message::Message;

/// Per-step context available to tools during execution.
///
/// - `recent_messages`: current conversation messages from state
/// - `thread_id` / `user_id`: from `RunnableConfig`
/// - `customer_id`: the verified customer from state (falls back to the config value);
///   `AgentTool` forwards it into the nested loop and the invoice tools default to it.
#[derive(Debug, Clone, Default)]
pub struct ToolCallContext {
    pub recent_messages: Vec<Message>,
    pub thread_id: Option<String>,
    pub user_id: Option<String>,
    pub customer_id: Option<String>,
}

impl ToolCallContext {
    /// Context with messages only; ids are `None`.
    pub fn new(recent_messages: Vec<Message>) -> Self {
        Self {
            recent_messages,
            ..Self::default()
        }
    }

    /// Sets the customer id (builder).
    pub fn with_customer_id(mut self, customer_id: Option<String>) -> Self {
        self.customer_id = customer_id;
        self
    }
}
