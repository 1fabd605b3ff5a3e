//! Act node: read tool_calls, call ToolSource for each, write tool_results.
//!
//! Tools run in request order. Every call receives a [`ToolCallContext`] built from the
//! state (messages, customer id) and the run config (thread and user ids).
//!
//! # Error Handling
//!
//! - `HandleToolErrors::Never` - errors propagate and abort the run (default)
//! - `HandleToolErrors::Always` - errors become error results fed back to the model
//! - `HandleToolErrors::Custom(handler)` - the handler formats the error result

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::error::AgentError;
use crate::graph::{Next, Node, RunContext};
use crate::state::{AgentState, ToolResult};
use crate::tool_source::{ToolCallContext, ToolSource, ToolSourceError};

/// Template for `HandleToolErrors::Always(None)`.
pub const DEFAULT_EXECUTION_ERROR_TEMPLATE: &str =
    "Error executing tool '{tool_name}' with kwargs {tool_kwargs} with error:\n {error}\n Please fix the error and try again.";

pub type ErrorHandlerFn =
    Arc<dyn Fn(&ToolSourceError, &str, &Value) -> String + Send + Sync + 'static>;

/// What ActNode does when a tool call fails.
#[derive(Clone, Default)]
pub enum HandleToolErrors {
    #[default]
    Never,
    /// Catch the error; use the given message or the default template.
    Always(Option<String>),
    Custom(ErrorHandlerFn),
}

impl std::fmt::Debug for HandleToolErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Never => write!(f, "HandleToolErrors::Never"),
            Self::Always(msg) => write!(f, "HandleToolErrors::Always({:?})", msg),
            Self::Custom(_) => write!(f, "HandleToolErrors::Custom(<fn>)"),
        }
    }
}

fn truncate_for_log(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_len).collect::<String>())
    }
}

/// Parses provider arguments leniently: blank or invalid JSON becomes `{}`, and a
/// JSON string holding an object is unwrapped once.
fn parse_tool_arguments(arguments: &str) -> Value {
    let raw = if arguments.trim().is_empty() {
        serde_json::json!({})
    } else {
        match serde_json::from_str(arguments) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, arguments = %arguments, "tool arguments JSON parse failed, using empty object");
                serde_json::json!({})
            }
        }
    };
    match raw.as_str() {
        Some(s) => serde_json::from_str(s).unwrap_or(raw),
        None => raw,
    }
}

pub struct ActNode {
    tools: Arc<dyn ToolSource>,
    handle_tool_errors: HandleToolErrors,
}

impl ActNode {
    pub fn new(tools: Arc<dyn ToolSource>) -> Self {
        Self {
            tools,
            handle_tool_errors: HandleToolErrors::Never,
        }
    }

    pub fn with_handle_tool_errors(mut self, handle_tool_errors: HandleToolErrors) -> Self {
        self.handle_tool_errors = handle_tool_errors;
        self
    }

    fn handle_error(
        &self,
        error: &ToolSourceError,
        tool_name: &str,
        tool_args: &Value,
    ) -> Option<String> {
        match &self.handle_tool_errors {
            HandleToolErrors::Never => None,
            HandleToolErrors::Always(custom_msg) => Some(custom_msg.clone().unwrap_or_else(|| {
                DEFAULT_EXECUTION_ERROR_TEMPLATE
                    .replace("{tool_name}", tool_name)
                    .replace("{tool_kwargs}", &tool_args.to_string())
                    .replace("{error}", &error.to_string())
            })),
            HandleToolErrors::Custom(handler) => Some(handler(error, tool_name, tool_args)),
        }
    }

    async fn execute(
        &self,
        mut state: AgentState,
        ctx: ToolCallContext,
    ) -> Result<(AgentState, Next), AgentError> {
        let mut tool_results = Vec::with_capacity(state.tool_calls.len());
        for tc in &state.tool_calls {
            let args = parse_tool_arguments(&tc.arguments);
            debug!(tool = %tc.name, args = %args, "Calling tool");
            match self
                .tools
                .call_tool_with_context(&tc.name, args.clone(), Some(&ctx))
                .await
            {
                Ok(content) => {
                    trace!(
                        tool = %tc.name,
                        result_preview = %truncate_for_log(&content.text, 200),
                        "Tool returned"
                    );
                    tool_results.push(ToolResult {
                        call_id: tc.id.clone(),
                        name: Some(tc.name.clone()),
                        content: content.text,
                        is_error: false,
                    });
                }
                Err(e) => {
                    warn!(tool = %tc.name, error = %e, "Tool call failed");
                    let Some(error_msg) = self.handle_error(&e, &tc.name, &args) else {
                        return Err(AgentError::ExecutionFailed(e.to_string()));
                    };
                    tool_results.push(ToolResult {
                        call_id: tc.id.clone(),
                        name: Some(tc.name.clone()),
                        content: error_msg,
                        is_error: true,
                    });
                }
            }
        }
        state.tool_results = tool_results;
        Ok((state, Next::Continue))
    }
}

#[async_trait]
impl Node<AgentState> for ActNode {
    fn id(&self) -> &str {
        "act"
    }

    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        let ctx = ToolCallContext::new(state.messages.clone())
            .with_customer_id(state.customer_id.clone());
        self.execute(state, ctx).await
    }

    async fn run_with_context(
        &self,
        state: AgentState,
        run_ctx: &RunContext,
    ) -> Result<(AgentState, Next), AgentError> {
        let ctx = ToolCallContext {
            recent_messages: state.messages.clone(),
            thread_id: run_ctx.config.thread_id.clone(),
            user_id: run_ctx.config.user_id.clone(),
            customer_id: state
                .customer_id
                .clone()
                .or_else(|| run_ctx.config.customer_id.clone()),
        };
        self.execute(state, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::RunnableConfig;
    use crate::state::ToolCall;
    use crate::tool_source::MockToolSource;

    fn state_with(calls: Vec<ToolCall>) -> AgentState {
        let mut s = AgentState::from_user("go");
        s.tool_calls = calls;
        s
    }

    #[test]
    fn parse_tool_arguments_is_lenient() {
        assert_eq!(parse_tool_arguments(""), serde_json::json!({}));
        assert_eq!(parse_tool_arguments("{not json"), serde_json::json!({}));
        assert_eq!(
            parse_tool_arguments(r#""{\"a\":1}""#),
            serde_json::json!({"a": 1})
        );
    }

    #[tokio::test]
    async fn runs_calls_in_order_and_forwards_customer_id() {
        let tools = Arc::new(
            MockToolSource::new()
                .with_tool("first", "one")
                .with_tool("second", "two"),
        );
        let node = ActNode::new(tools.clone());
        let mut state = state_with(vec![
            ToolCall::new("first", "{}").with_id("c1"),
            ToolCall::new("second", r#"{"x":1}"#),
        ]);
        state.customer_id = Some("5".into());
        let ctx = RunContext::new(RunnableConfig::default());
        let (out, _) = node.run_with_context(state, &ctx).await.unwrap();

        let contents: Vec<_> = out.tool_results.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two"]);
        assert_eq!(out.tool_results[0].call_id.as_deref(), Some("c1"));
        let calls = tools.calls();
        assert_eq!(calls[1].1, serde_json::json!({"x": 1}));
        assert!(calls.iter().all(|c| c.2.as_deref() == Some("5")));
    }

    #[tokio::test]
    async fn config_customer_id_used_when_state_has_none() {
        let tools = Arc::new(MockToolSource::new().with_tool("t", "ok"));
        let node = ActNode::new(tools.clone());
        let config = RunnableConfig {
            customer_id: Some("9".into()),
            ..RunnableConfig::default()
        };
        node.run_with_context(state_with(vec![ToolCall::new("t", "{}")]), &RunContext::new(config))
            .await
            .unwrap();
        assert_eq!(tools.calls()[0].2.as_deref(), Some("9"));
    }

    #[tokio::test]
    async fn tool_error_propagates_by_default() {
        let tools = Arc::new(MockToolSource::new().with_failing_tool("bad", "boom"));
        let node = ActNode::new(tools);
        let err = node
            .run(state_with(vec![ToolCall::new("bad", "{}")]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn tool_error_becomes_result_when_handled() {
        let tools = Arc::new(MockToolSource::new().with_failing_tool("bad", "boom"));
        let node =
            ActNode::new(tools).with_handle_tool_errors(HandleToolErrors::Always(None));
        let (out, _) = node
            .run(state_with(vec![ToolCall::new("bad", "{}"), ToolCall::new("missing", "{}")]))
            .await
            .unwrap();
        assert_eq!(out.tool_results.len(), 2);
        assert!(out.tool_results.iter().all(|r| r.is_error));
        assert!(out.tool_results[0].content.contains("Error executing tool 'bad'"));
        assert!(out.tool_results[1].content.contains("tool not found"));
    }
}
