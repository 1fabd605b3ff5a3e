use std::sync::Arc;

use async_trait::async_trait;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSource, ToolSourceError, ToolSpec};
use crate::tools::{Tool, ToolRegistry};

/// `ToolSource` backed by a `ToolRegistry`.
///
/// Tools are registered while building the agent; after that the source is shared
/// read-only, and the per-call context is passed straight through to each tool.
#[derive(Default)]
pub struct AggregateToolSource {
    registry: ToolRegistry,
}

impl AggregateToolSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.registry.register(tool);
    }

    /// Registers a tool (builder).
    pub fn with_tool(mut self, tool: Box<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    /// Specs of all registered tools, ordered by name.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.registry.list()
    }

    /// Registered tool names, ordered.
    pub fn tool_names(&self) -> Vec<String> {
        self.registry.names()
    }
}

#[async_trait]
impl ToolSource for AggregateToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.registry.list())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.registry.call(name, arguments, None).await
    }

    async fn call_tool_with_context(
        &self,
        name: &str,
        arguments: serde_json::Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.registry.call(name, arguments, ctx).await
    }
}

#[async_trait]
impl ToolSource for Arc<AggregateToolSource> {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        self.as_ref().list_tools().await
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.as_ref().call_tool(name, arguments).await
    }

    async fn call_tool_with_context(
        &self,
        name: &str,
        arguments: serde_json::Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.as_ref()
            .call_tool_with_context(name, arguments, ctx)
            .await
    }
}
