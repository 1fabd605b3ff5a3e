use std::collections::BTreeMap;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError, ToolSpec};
use crate::tools::r#trait::Tool;

/// Registry of tools keyed by name.
///
/// `list()` is ordered by name so the tool list sent to the LLM is stable.
///
/// # Interaction
///
/// - **Tool**: Stores `Box<dyn Tool>` instances
/// - **AggregateToolSource**: Delegates `list_tools()` and `call_tool()` to this registry
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool; replaces any tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Specs of all registered tools.
    pub fn list(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|tool| tool.spec()).collect()
    }

    /// Registered tool names, ordered.
    pub fn names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    /// Calls a tool by name. Returns `ToolSourceError::NotFound` for unknown names.
    pub async fn call(
        &self,
        name: &str,
        args: serde_json::Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolSourceError::NotFound(name.to_string()))?;
        tool.call(args, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct Named(&'static str);

    #[async_trait]
    impl Tool for Named {
        fn name(&self) -> &str {
            self.0
        }
        fn spec(&self) -> ToolSpec {
            ToolSpec {
                name: self.0.to_string(),
                description: None,
                input_schema: json!({}),
            }
        }
        async fn call(
            &self,
            _args: serde_json::Value,
            _ctx: Option<&ToolCallContext>,
        ) -> Result<ToolCallContent, ToolSourceError> {
            Ok(ToolCallContent::text(self.0))
        }
    }

    #[tokio::test]
    async fn list_is_sorted_and_unknown_tool_is_not_found() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(Named("zeta")));
        registry.register(Box::new(Named("alpha")));
        let names: Vec<_> = registry.list().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);

        let out = registry.call("zeta", json!({}), None).await.unwrap();
        assert_eq!(out.text, "zeta");
        let err = registry.call("nope", json!({}), None).await.unwrap_err();
        assert!(matches!(err, ToolSourceError::NotFound(n) if n == "nope"));
    }
}
