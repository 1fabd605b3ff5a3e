//! Tool-calling loop: graph nodes (Think, Act, Observe), routing predicates, runner
//! and the agent-as-tool adapter.
//!
//! # Main types
//!
//! - **[`ThinkNode`]**: Calls the LLM with current messages; may output tool calls.
//! - **[`ActNode`]**: Executes tool_calls via ToolSource and fills tool_results.
//! - **[`ObserveNode`]**: Merges tool results into messages, clears tool_calls/tool_results.
//! - **[`ReactRunner`]**: Compiled loop plus checkpointer and run config.
//! - **[`AgentTool`]**: A `ReactRunner` exposed as a `Tool`.
//!
//! # Exit conditions
//!
//! [`tools_condition`] ends the loop when the model stops requesting tools;
//! [`done_condition`] additionally ends it when the model calls the [`DONE_TOOL`].

mod act_node;
mod agent_tool;
mod observe_node;
mod runner;
mod think_node;

pub use act_node::{
    ActNode, ErrorHandlerFn, HandleToolErrors, DEFAULT_EXECUTION_ERROR_TEMPLATE,
};
pub use agent_tool::{AgentTool, NO_REPLY};
pub use observe_node::{ObserveNode, DEFAULT_MAX_TURNS};
pub use runner::{LoopExit, ReactRunner, ReactRunnerBuilder, RunError};
pub use think_node::ThinkNode;

use crate::state::AgentState;

/// Name of the tool a model calls to signal that the task is finished.
pub const DONE_TOOL: &str = "Done";

/// Output of the routing predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolsConditionResult {
    /// Route to the tools execution node.
    Tools,
    /// Route to END.
    End,
}

impl ToolsConditionResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tools => "tools",
            Self::End => crate::graph::END,
        }
    }
}

/// Routes to the tools node while tool calls are pending; otherwise ends.
pub fn tools_condition(state: &AgentState) -> ToolsConditionResult {
    if state.tool_calls.is_empty() {
        ToolsConditionResult::End
    } else {
        ToolsConditionResult::Tools
    }
}

/// Ends when the latest request contains a `Done` tool call or no tool calls at all.
///
/// The match on the tool name is exact. Other calls in the same batch as `Done` are
/// not executed.
pub fn done_condition(state: &AgentState) -> ToolsConditionResult {
    if state.tool_calls.iter().any(|tc| tc.name == DONE_TOOL) {
        return ToolsConditionResult::End;
    }
    tools_condition(state)
}
