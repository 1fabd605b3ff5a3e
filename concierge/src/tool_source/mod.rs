//! Tool source abstraction: list tools and call a tool.
//!
//! The tool-calling loop depends on `ToolSource` instead of a concrete registry;
//! implementations are `AggregateToolSource` (a `ToolRegistry` of `Tool`s) and
//! `MockToolSource` (tests).
//!
//! Per-call data (recent messages, thread/user/customer ids) travels in an explicit
//! [`ToolCallContext`] argument; sources keep no per-call state, so one source can
//! serve concurrent runs.

mod context;
mod mock;

pub use context::ToolCallContext;
pub use mock::MockToolSource;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Tool specification: name, description for the LLM and JSON Schema for arguments.
///
/// **Interaction**: Returned by `ToolSource::list_tools()`; consumed by `ChatOpenAI::with_tools`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: Option<String>,
    /// JSON Schema for arguments.
    pub input_schema: Value,
}

/// Result of a single tool call.
///
/// **Interaction**: Returned by `ToolSource::call_tool()`; ActNode maps this to `ToolResult`.
#[derive(Debug, Clone)]
pub struct ToolCallContent {
    pub text: String,
}

impl ToolCallContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Errors from listing or calling tools.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
    /// The tool ran but failed (database error, nested agent error).
    #[error("tool execution failed: {0}")]
    Execution(String),
}

/// Tool source: list tools and call a tool.
///
/// **Interaction**: Used by ActNode (`call_tool_with_context`) and by runners that hand
/// `list_tools()` to the LLM client.
#[async_trait]
pub trait ToolSource: Send + Sync {
    /// List available tools.
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    /// Call a tool by name with JSON arguments.
    async fn call_tool(&self, name: &str, arguments: Value)
        -> Result<ToolCallContent, ToolSourceError>;

    /// Call a tool with optional per-step context. Default ignores `ctx`.
    async fn call_tool_with_context(
        &self,
        name: &str,
        arguments: Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let _ = ctx;
        self.call_tool(name, arguments).await
    }
}
