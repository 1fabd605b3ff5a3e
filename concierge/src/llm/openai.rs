//! OpenAI Chat Completions client implementing `LlmClient` (ChatOpenAI).
//!
//! Requires `OPENAI_API_KEY` in the environment (or explicit config); `OPENAI_BASE_URL`
//! points it at a compatible endpoint. Optional tools enable `tool_calls` in the response.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCalls, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage, ChatCompletionTool,
        ChatCompletionToolChoiceOption, ChatCompletionTools, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse, FunctionObject,
        ToolChoiceOptions,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, trace};

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse, LlmUsage, ModelConfig};
use crate::message::Message;
use crate::state::ToolCall;
use crate::tool_source::ToolSpec;

use super::ToolChoiceMode;

/// OpenAI Chat Completions client.
///
/// **Interaction**: Implements `LlmClient`; used by ThinkNode and CreateMemoryNode.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    tools: Option<Vec<ToolSpec>>,
    temperature: Option<f32>,
    tool_choice: Option<ToolChoiceMode>,
}

impl ChatOpenAI {
    /// Build client with default config (API key from `OPENAI_API_KEY` env).
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_config(Self::config_from_env(), model)
    }

    /// Build client with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            tools: None,
            temperature: None,
            tool_choice: None,
        }
    }

    /// Client for a [`ModelConfig`]: model, temperature and tool choice applied.
    pub fn from_model_config(model: &ModelConfig) -> Self {
        Self::new(model.model.clone())
            .with_temperature(model.temperature)
            .with_tool_choice(model.tool_choice)
    }

    fn config_from_env() -> OpenAIConfig {
        let mut config = OpenAIConfig::new();
        if let Ok(base) = std::env::var("OPENAI_BASE_URL") {
            config = config.with_api_base(base.trim_end_matches('/'));
        }
        config
    }

    /// Set tools for this completion (enables tool_calls in response).
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Set temperature (0–2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set tool choice mode; only sent when tools are present.
    pub fn with_tool_choice(mut self, mode: ToolChoiceMode) -> Self {
        self.tool_choice = Some(mode);
        self
    }

    fn messages_to_request(messages: &[Message]) -> Vec<ChatCompletionRequestMessage> {
        messages
            .iter()
            .map(|m| match m {
                Message::System(s) => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage::from(s.as_str()),
                ),
                Message::User(s) => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(s.as_str()),
                ),
                Message::Assistant(s) => {
                    ChatCompletionRequestMessage::Assistant((s.as_str()).into())
                }
            })
            .collect()
    }
}

fn to_chat_tool(spec: &ToolSpec) -> ChatCompletionTools {
    ChatCompletionTools::Function(ChatCompletionTool {
        function: FunctionObject {
            name: spec.name.clone(),
            description: spec.description.clone(),
            parameters: Some(spec.input_schema.clone()),
            ..Default::default()
        },
    })
}

fn to_choice_option(mode: ToolChoiceMode) -> ChatCompletionToolChoiceOption {
    ChatCompletionToolChoiceOption::Mode(match mode {
        ToolChoiceMode::Auto => ToolChoiceOptions::Auto,
        ToolChoiceMode::None => ToolChoiceOptions::None,
        ToolChoiceMode::Required => ToolChoiceOptions::Required,
    })
}

impl ChatOpenAI {
    /// Request for one completion. `tool_choice` is set only when tools are bound.
    fn build_request(
        &self,
        messages: &[Message],
    ) -> Result<CreateChatCompletionRequest, AgentError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone())
            .messages(Self::messages_to_request(messages));
        if let Some(tools) = self.tools.as_ref().filter(|t| !t.is_empty()) {
            args.tools(tools.iter().map(to_chat_tool).collect::<Vec<_>>());
            if let Some(mode) = self.tool_choice {
                args.tool_choice(to_choice_option(mode));
            }
        }
        if let Some(t) = self.temperature {
            args.temperature(t);
        }
        args.build().map_err(|e| {
            AgentError::ExecutionFailed(format!("OpenAI request build failed: {}", e))
        })
    }
}

/// First choice's text and function calls; other tool call kinds are dropped.
fn into_llm_response(response: CreateChatCompletionResponse) -> Result<LlmResponse, AgentError> {
    let usage = response.usage.as_ref().map(|u| LlmUsage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });
    let message = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AgentError::ExecutionFailed("OpenAI returned no choices".to_string()))?
        .message;
    let tool_calls = message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .filter_map(|tc| match tc {
            ChatCompletionMessageToolCalls::Function(f) => Some(ToolCall {
                name: f.function.name,
                arguments: f.function.arguments,
                id: Some(f.id),
            }),
            _ => None,
        })
        .collect();
    Ok(LlmResponse {
        content: message.content.unwrap_or_default(),
        tool_calls,
        usage,
    })
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let request = self.build_request(messages)?;
        debug!(
            model = %self.model,
            message_count = messages.len(),
            tools_count = self.tools.as_ref().map_or(0, |t| t.len()),
            tool_choice = ?self.tool_choice,
            "OpenAI chat create"
        );
        if let Ok(js) = serde_json::to_string(&request) {
            trace!(request = %js, "OpenAI request body");
        }

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("OpenAI API error: {}", e)))?;
        let out = into_llm_response(response)?;
        trace!(tool_calls = out.tool_calls.len(), "OpenAI response");
        Ok(out)
    }
}
