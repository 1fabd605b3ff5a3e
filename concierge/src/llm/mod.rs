//! LLM client abstraction for the Think node.
//!
//! ThinkNode depends on a callable that returns assistant text and optional
//! tool_calls; this module defines the trait, a scripted mock, the OpenAI client
//! and the model selection read from the environment.

mod mock;
mod model;
mod openai;

pub use mock::MockLlm;
pub use model::{ModelConfig, ENV_MODEL, ENV_TEMPERATURE};
pub use openai::ChatOpenAI;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::Message;
use crate::state::ToolCall;
use crate::tool_source::ToolSpec;

/// Tool choice mode for chat completions: when tools are present, controls whether
/// the model may choose (auto), must not use (none), or must use (required).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ToolChoiceMode {
    /// Model can pick between message or tool calls.
    #[default]
    Auto,
    /// Model will not call any tool.
    None,
    /// Model must call one or more tools.
    Required,
}

impl std::str::FromStr for ToolChoiceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "none" => Ok(Self::None),
            "required" => Ok(Self::Required),
            _ => Err(format!(
                "unknown tool_choice: {} (use auto, none, or required)",
                s
            )),
        }
    }
}

/// Token usage for one LLM call (prompt + completion).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl LlmUsage {
    /// Field-wise sum.
    pub fn add(&self, other: &LlmUsage) -> LlmUsage {
        LlmUsage {
            prompt_tokens: self.prompt_tokens + other.prompt_tokens,
            completion_tokens: self.completion_tokens + other.completion_tokens,
            total_tokens: self.total_tokens + other.total_tokens,
        }
    }
}

/// Response from an LLM completion: assistant message text and optional tool calls.
///
/// **Interaction**: Returned by `LlmClient::invoke()`; ThinkNode writes `content` into a
/// new assistant message and `tool_calls` into `AgentState::tool_calls`.
#[derive(Clone, Debug, Default)]
pub struct LlmResponse {
    pub content: String,
    /// Tool calls from this turn; empty means the model answered directly.
    pub tool_calls: Vec<ToolCall>,
    pub usage: Option<LlmUsage>,
}

impl LlmResponse {
    /// Plain text reply without tool calls.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Tool-only reply.
    pub fn tools(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::default()
        }
    }
}

/// LLM client: given messages, returns assistant text and optional tool_calls.
///
/// Implementations: `MockLlm` (fixed or scripted responses), `ChatOpenAI` (real API).
///
/// **Interaction**: Used by ThinkNode and CreateMemoryNode.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Invoke one turn: read messages, return assistant content and optional tool_calls.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError>;
}

/// Builds an LLM client bound to a tool list and tool choice.
///
/// Graph builders call it once per agent so each agent's model sees only its own tools.
pub type LlmFactory =
    std::sync::Arc<dyn Fn(&[ToolSpec], ToolChoiceMode) -> std::sync::Arc<dyn LlmClient> + Send + Sync>;

/// Factory creating `ChatOpenAI` clients for `model`.
pub fn openai_factory(model: ModelConfig) -> LlmFactory {
    std::sync::Arc::new(move |tools: &[ToolSpec], tool_choice: ToolChoiceMode| {
        let mut client = ChatOpenAI::from_model_config(&model);
        if !tools.is_empty() {
            client = client.with_tools(tools.to_vec()).with_tool_choice(tool_choice);
        }
        std::sync::Arc::new(client) as std::sync::Arc<dyn LlmClient>
    })
}
