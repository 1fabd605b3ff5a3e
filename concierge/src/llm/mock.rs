//! Mock LLM for tests and offline runs.
//!
//! Three modes: a fixed response, first-tools-then-end (one tool round, then a
//! final answer), and scripted (a queue of responses consumed in order).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse};
use crate::message::Message;
use crate::state::ToolCall;

enum Mode {
    Fixed(LlmResponse),
    FirstThenEnd {
        first: LlmResponse,
        then: String,
        calls: AtomicUsize,
    },
    Scripted(Mutex<VecDeque<LlmResponse>>),
}

/// Mock LLM: fixed, first-tools-then-end, or scripted responses.
///
/// Every call's input messages are recorded and can be inspected with `seen_messages`.
///
/// **Interaction**: Implements `LlmClient`; used by ThinkNode in tests and by the CLI
/// when no API key is configured.
pub struct MockLlm {
    mode: Mode,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Returns assistant text and no tool_calls (END path) on every call.
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self::with_mode(Mode::Fixed(LlmResponse::text(content)))
    }

    /// Returns the same content and tool_calls on every call.
    pub fn new(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::with_mode(Mode::Fixed(LlmResponse {
            content: content.into(),
            tool_calls,
            usage: None,
        }))
    }

    /// First call returns `tool_calls`; later calls return `final_answer` with no tool_calls.
    pub fn first_tools_then_end(tool_calls: Vec<ToolCall>, final_answer: impl Into<String>) -> Self {
        Self::with_mode(Mode::FirstThenEnd {
            first: LlmResponse::tools(tool_calls),
            then: final_answer.into(),
            calls: AtomicUsize::new(0),
        })
    }

    /// Returns the given responses in order. Once exhausted, replies with an empty
    /// assistant message and no tool calls so a loop always terminates.
    pub fn scripted(responses: Vec<LlmResponse>) -> Self {
        Self::with_mode(Mode::Scripted(Mutex::new(responses.into())))
    }

    /// Message lists received so far, one entry per call.
    pub fn seen_messages(&self) -> Vec<Vec<Message>> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Number of invoke calls so far.
    pub fn call_count(&self) -> usize {
        self.seen.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(messages.to_vec());
        }
        let response = match &self.mode {
            Mode::Fixed(r) => r.clone(),
            Mode::FirstThenEnd { first, then, calls } => {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    first.clone()
                } else {
                    LlmResponse::text(then.clone())
                }
            }
            Mode::Scripted(queue) => queue
                .lock()
                .map_err(|_| AgentError::ExecutionFailed("mock script poisoned".into()))?
                .pop_front()
                .unwrap_or_default(),
        };
        Ok(response)
    }
}
