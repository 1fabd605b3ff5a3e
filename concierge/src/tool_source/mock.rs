//! Mock tool source for tests: fixed tool list, records calls, canned results.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{ToolCallContent, ToolCallContext, ToolSource, ToolSourceError, ToolSpec};

/// Mock ToolSource: returns a canned text per tool name and records every call with
/// the customer id it received.
#[derive(Default)]
pub struct MockToolSource {
    results: HashMap<String, Result<String, String>>,
    calls: Mutex<Vec<(String, Value, Option<String>)>>,
}

impl MockToolSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool that returns `text` (builder).
    pub fn with_tool(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.results.insert(name.into(), Ok(text.into()));
        self
    }

    /// Registers a tool that fails with `ToolSourceError::Execution(message)` (builder).
    pub fn with_failing_tool(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.results.insert(name.into(), Err(message.into()));
        self
    }

    /// Calls made so far: (name, arguments, customer_id from context).
    pub fn calls(&self) -> Vec<(String, Value, Option<String>)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ToolSource for MockToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        let mut names: Vec<&String> = self.results.keys().collect();
        names.sort();
        Ok(names
            .into_iter()
            .map(|n| ToolSpec {
                name: n.clone(),
                description: Some(format!("mock tool {}", n)),
                input_schema: serde_json::json!({"type": "object"}),
            })
            .collect())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.call_tool_with_context(name, arguments, None).await
    }

    async fn call_tool_with_context(
        &self,
        name: &str,
        arguments: Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((
                name.to_string(),
                arguments,
                ctx.and_then(|c| c.customer_id.clone()),
            ));
        }
        match self.results.get(name) {
            Some(Ok(text)) => Ok(ToolCallContent::text(text.clone())),
            Some(Err(msg)) => Err(ToolSourceError::Execution(msg.clone())),
            None => Err(ToolSourceError::NotFound(name.to_string())),
        }
    }
}
