//! AgentTool: exposes a ReactRunner as a Tool that other agents can call.
//!
//! Use [`ReactRunner::as_tool`] to convert a named runner into an `AgentTool`, then
//! register it in the supervisor's `AggregateToolSource`.
//!
//! # Input schema
//!
//! ```json
//! { "task": "<natural-language task description>" }
//! ```
//!
//! The caller's `customer_id` (from `ToolCallContext`) is forwarded into the nested
//! loop; the nested loop's final reply is returned as the tool result.

use std::sync::Arc;

use async_trait::async_trait;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError, ToolSpec};
use crate::tools::Tool;

use super::runner::ReactRunner;

/// Tool result when the nested loop produced no assistant text.
pub const NO_REPLY: &str = "(no reply)";

/// A [`Tool`] wrapping a [`ReactRunner`], allowing other agents to delegate tasks.
pub struct AgentTool {
    runner: Arc<ReactRunner>,
    name: String,
}

impl AgentTool {
    /// Wraps a runner. The tool name is the runner name with spaces and hyphens
    /// replaced by underscores (`"agent"` when unnamed).
    pub fn new(runner: Arc<ReactRunner>) -> Self {
        let name = runner
            .name
            .as_deref()
            .unwrap_or("agent")
            .replace([' ', '-'], "_");
        Self { runner, name }
    }
}

#[async_trait]
impl Tool for AgentTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn spec(&self) -> ToolSpec {
        let description = self
            .runner
            .description
            .clone()
            .unwrap_or_else(|| format!("Delegate a task to the {} agent.", self.name));

        ToolSpec {
            name: self.name.clone(),
            description: Some(description),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "task": {
                        "type": "string",
                        "description": "The task or question to delegate to this agent. Provide full context; the agent has no memory of the current conversation."
                    }
                },
                "required": ["task"]
            }),
        }
    }

    async fn call(
        &self,
        args: serde_json::Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let task = crate::tools::required_str(&args, "task")?;
        let customer_id = ctx.and_then(|c| c.customer_id.clone());
        tracing::info!(agent = %self.name, customer_id = ?customer_id, "delegating task");

        let final_state = self
            .runner
            .invoke_with_customer(task, customer_id)
            .await
            .map_err(|e| ToolSourceError::Execution(e.to_string()))?;

        let reply = final_state
            .last_nonempty_reply()
            .unwrap_or_else(|| NO_REPLY.to_string());
        Ok(ToolCallContent { text: reply })
    }
}
