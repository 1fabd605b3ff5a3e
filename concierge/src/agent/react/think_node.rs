//! Think node: read messages, call LLM, write assistant message and optional tool_calls.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::{LlmClient, LlmUsage};
use crate::message::Message;
use crate::state::AgentState;

pub struct ThinkNode {
    llm: Arc<dyn LlmClient>,
    system_prompt: Option<String>,
}

impl ThinkNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            system_prompt: None,
        }
    }

    /// Prompt sent ahead of the conversation on every call. It is not stored in state.
    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt;
        self
    }

    /// Messages for this call: the configured prompt (plus customer id and loaded memory)
    /// goes first unless the conversation already starts with its own system message.
    fn request_messages(&self, state: &AgentState) -> Vec<Message> {
        let Some(prompt) = self.system_prompt.as_deref() else {
            return state.messages.clone();
        };
        if matches!(state.messages.first(), Some(Message::System(_))) {
            return state.messages.clone();
        }
        let mut system = prompt.to_string();
        if let Some(id) = state.customer_id.as_deref() {
            system.push_str(&format!("\n\nThe verified customer id is {}.", id));
        }
        if let Some(memory) = state.loaded_memory.as_deref().filter(|m| !m.is_empty()) {
            system.push_str(&format!("\n\nLoaded memory for this customer: {}", memory));
        }
        let mut messages = Vec::with_capacity(state.messages.len() + 1);
        messages.push(Message::system(system));
        messages.extend(state.messages.iter().cloned());
        messages
    }
}

fn accumulate(total: &Option<LlmUsage>, usage: &Option<LlmUsage>) -> Option<LlmUsage> {
    match (total, usage) {
        (Some(t), Some(u)) => Some(t.add(u)),
        (None, Some(u)) => Some(u.clone()),
        (t, None) => t.clone(),
    }
}

#[async_trait]
impl Node<AgentState> for ThinkNode {
    fn id(&self) -> &str {
        "think"
    }

    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        let messages = self.request_messages(&state);
        let response = self.llm.invoke(&messages).await?;
        tracing::debug!(
            tool_calls = response.tool_calls.len(),
            content_len = response.content.len(),
            "think"
        );
        let total_usage = accumulate(&state.total_usage, &response.usage);
        let mut state = state;
        state.messages.push(Message::assistant(response.content));
        state.tool_calls = response.tool_calls;
        state.usage = response.usage;
        state.total_usage = total_usage;
        Ok((state, Next::Continue))
    }
}
