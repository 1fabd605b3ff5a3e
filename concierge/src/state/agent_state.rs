//! Agent state and tool types for the tool-calling loop.
//!
//! AgentState holds messages plus per-round tool_calls and tool_results; Think/Act/Observe
//! nodes read and write these fields. The supervisor graph additionally fills
//! `customer_id` (verify step) and `loaded_memory` (load-memory step).

use serde::{Deserialize, Serialize};

use crate::llm::LlmUsage;
use crate::message::Message;

/// A single tool invocation produced by the LLM (Think node) and consumed by Act.
///
/// `arguments` is the raw JSON string from the provider; Act parses it when calling
/// the tool. Optional `id` correlates with `ToolResult::call_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name as registered in the ToolSource.
    pub name: String,
    /// Arguments as JSON string.
    pub arguments: String,
    /// Optional provider id for this call.
    pub id: Option<String>,
}

impl ToolCall {
    /// Convenience constructor used by tests and scripted mocks.
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
            id: None,
        }
    }

    /// Sets the call id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Result of executing one tool call (Act node output, Observe node input).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Id of the tool call this result belongs to (if ToolCall had `id`).
    pub call_id: Option<String>,
    /// Tool name; alternative to call_id for matching.
    pub name: Option<String>,
    /// Result text.
    pub content: String,
    /// True when the content is an error message produced by the error handler.
    #[serde(default)]
    pub is_error: bool,
}

/// State for the tool-calling loop and the supervisor graph.
///
/// Satisfies `Clone + Send + Sync + 'static` for use with `Node<AgentState>` and
/// `StateGraph<AgentState>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Conversation history (System, User, Assistant).
    pub messages: Vec<Message>,
    /// Current round tool calls from the LLM (Think writes, Act reads).
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    /// Current round tool execution results (Act writes, Observe reads and merges).
    #[serde(default)]
    pub tool_results: Vec<ToolResult>,
    /// Number of observe rounds completed.
    #[serde(default)]
    pub turn_count: u32,
    /// Verified customer identifier; forwarded into sub-agents by `AgentTool`.
    #[serde(default)]
    pub customer_id: Option<String>,
    /// Memory blob loaded for the customer (e.g. music preferences).
    #[serde(default)]
    pub loaded_memory: Option<String>,
    /// Token usage for the last LLM call.
    #[serde(default)]
    pub usage: Option<LlmUsage>,
    /// Accumulated token usage over the whole run.
    #[serde(default)]
    pub total_usage: Option<LlmUsage>,
}

impl AgentState {
    /// State with a single user message.
    pub fn from_user(message: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(message)],
            ..Self::default()
        }
    }

    /// Returns the content of the chronologically last Assistant message, if any.
    ///
    /// An assistant turn with only tool_calls has empty content and returns `Some("")`.
    /// Returns `None` only when there is no Assistant message at all.
    pub fn last_assistant_reply(&self) -> Option<String> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Assistant(s) => Some(s.clone()),
            _ => None,
        })
    }

    /// Last non-empty assistant reply; skips tool-only turns.
    pub fn last_nonempty_reply(&self) -> Option<String> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Assistant(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        })
    }

    /// Content of the last User message, if any.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::User(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Clears per-round tool data before a new user turn is appended.
    pub fn reset_round(&mut self) {
        self.tool_calls.clear();
        self.tool_results.clear();
    }

    /// Starts a new turn on a continued conversation: clears round data and the turn
    /// counter, then appends the new input messages.
    pub fn begin_turn(&mut self, input: impl IntoIterator<Item = Message>) {
        self.reset_round();
        self.turn_count = 0;
        self.messages.extend(input);
    }
}
