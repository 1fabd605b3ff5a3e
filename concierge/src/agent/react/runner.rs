//! ReactRunner: builds the think → act → observe loop, loads prior thread state and invokes it.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AgentError;
use crate::graph::{CompilationError, CompiledStateGraph, StateGraph, END, START};
use crate::llm::LlmClient;
use crate::memory::{CheckpointError, Checkpointer, RunnableConfig};
use crate::message::Message;
use crate::runner_common::load_and_append;
use crate::state::AgentState;
use crate::tool_source::{ToolSource, ToolSourceError, ToolSpec};

use super::act_node::{ActNode, HandleToolErrors};
use super::agent_tool::AgentTool;
use super::observe_node::{ObserveNode, DEFAULT_MAX_TURNS};
use super::think_node::ThinkNode;
use super::{done_condition, tools_condition};

/// Error from building or running a loop.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("compilation failed: {0}")]
    Compilation(#[from] CompilationError),
    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),
    #[error("execution failed: {0}")]
    Execution(#[from] AgentError),
}

/// Which predicate decides when the loop stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopExit {
    /// Stop when the model answers without tool calls.
    #[default]
    NoToolCalls,
    /// Also stop when the model calls the `Done` tool.
    DoneTool,
}

/// Builder for [`ReactRunner`].
pub struct ReactRunnerBuilder {
    llm: Arc<dyn LlmClient>,
    tools: Arc<dyn ToolSource>,
    system_prompt: Option<String>,
    exit: LoopExit,
    max_turns: u32,
    handle_tool_errors: HandleToolErrors,
    checkpointer: Option<Arc<dyn Checkpointer<AgentState>>>,
    runnable_config: Option<RunnableConfig>,
    name: Option<String>,
    description: Option<String>,
}

impl ReactRunnerBuilder {
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn exit(mut self, exit: LoopExit) -> Self {
        self.exit = exit;
        self
    }

    pub fn max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn handle_tool_errors(mut self, handle: HandleToolErrors) -> Self {
        self.handle_tool_errors = handle;
        self
    }

    /// Saves the final state per thread and reloads it on the next invoke with the same thread_id.
    pub fn checkpointer(mut self, checkpointer: Arc<dyn Checkpointer<AgentState>>) -> Self {
        self.checkpointer = Some(checkpointer);
        self
    }

    /// Config used when an invoke passes none.
    pub fn runnable_config(mut self, config: RunnableConfig) -> Self {
        self.runnable_config = Some(config);
        self
    }

    /// Name under which [`ReactRunner::as_tool`] exposes the loop.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Compiles the graph: START → think → (condition) → act → observe → think.
    pub fn build(self) -> Result<ReactRunner, CompilationError> {
        let think = ThinkNode::new(Arc::clone(&self.llm)).with_system_prompt(self.system_prompt);
        let act = ActNode::new(Arc::clone(&self.tools))
            .with_handle_tool_errors(self.handle_tool_errors);
        let observe = ObserveNode::with_max_turns(self.max_turns);

        let path_map: HashMap<String, String> =
            [("tools".into(), "act".into()), (END.into(), END.into())]
                .into_iter()
                .collect();
        let condition = match self.exit {
            LoopExit::NoToolCalls => tools_condition,
            LoopExit::DoneTool => done_condition,
        };

        let mut graph = StateGraph::<AgentState>::new();
        graph
            .add_node("think", Arc::new(think))
            .add_node("act", Arc::new(act))
            .add_node("observe", Arc::new(observe))
            .add_edge(START, "think")
            .add_conditional_edges(
                "think",
                Arc::new(move |state: &AgentState| condition(state).as_str().to_string()),
                Some(path_map),
            )
            .add_edge("act", "observe")
            .add_edge("observe", "think");

        let compiled = match &self.checkpointer {
            Some(cp) => graph.compile_with_checkpointer(Arc::clone(cp))?,
            None => graph.compile()?,
        };

        Ok(ReactRunner {
            compiled,
            tools: self.tools,
            checkpointer: self.checkpointer,
            runnable_config: self.runnable_config,
            name: self.name,
            description: self.description,
        })
    }
}

/// Tool-calling loop: compiled graph, tool source, optional checkpointer.
pub struct ReactRunner {
    compiled: CompiledStateGraph<AgentState>,
    tools: Arc<dyn ToolSource>,
    checkpointer: Option<Arc<dyn Checkpointer<AgentState>>>,
    runnable_config: Option<RunnableConfig>,
    pub(super) name: Option<String>,
    pub(super) description: Option<String>,
}

impl ReactRunner {
    pub fn builder(llm: Arc<dyn LlmClient>, tools: Arc<dyn ToolSource>) -> ReactRunnerBuilder {
        ReactRunnerBuilder {
            llm,
            tools,
            system_prompt: None,
            exit: LoopExit::NoToolCalls,
            max_turns: DEFAULT_MAX_TURNS,
            handle_tool_errors: HandleToolErrors::Never,
            checkpointer: None,
            runnable_config: None,
            name: None,
            description: None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Tools the loop can call.
    pub async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        self.tools.list_tools().await
    }

    /// Runs one user turn with the default config.
    pub async fn invoke(&self, user_message: &str) -> Result<AgentState, RunError> {
        self.invoke_with_config(user_message, None).await
    }

    /// Runs one user turn with the customer id pre-set (used by delegation).
    pub async fn invoke_with_customer(
        &self,
        user_message: &str,
        customer_id: Option<String>,
    ) -> Result<AgentState, RunError> {
        let mut config = self.runnable_config.clone().unwrap_or_default();
        config.customer_id = customer_id;
        self.invoke_with_config(user_message, Some(config)).await
    }

    /// Runs one user turn. With a checkpointer and `thread_id`, the saved thread state is
    /// continued; otherwise a fresh conversation starts.
    pub async fn invoke_with_config(
        &self,
        user_message: &str,
        config: Option<RunnableConfig>,
    ) -> Result<AgentState, RunError> {
        self.invoke_messages(vec![Message::user(user_message)], config)
            .await
    }

    /// Runs one turn whose input is several messages, appended in order.
    pub async fn invoke_messages(
        &self,
        input: Vec<Message>,
        config: Option<RunnableConfig>,
    ) -> Result<AgentState, RunError> {
        let config = config
            .or_else(|| self.runnable_config.clone())
            .unwrap_or_default();
        let state = load_and_append(self.checkpointer.as_deref(), &config, input).await?;
        self.invoke_state(state, Some(config)).await
    }

    /// Runs the loop on a caller-built state.
    pub async fn invoke_state(
        &self,
        state: AgentState,
        config: Option<RunnableConfig>,
    ) -> Result<AgentState, RunError> {
        let config = config.or_else(|| self.runnable_config.clone());
        Ok(self.compiled.invoke(state, config).await?)
    }

    /// Exposes this loop as a [`Tool`](crate::tools::Tool) taking `{"task": ...}`.
    pub fn as_tool(self) -> AgentTool {
        AgentTool::new(Arc::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmResponse, MockLlm};
    use crate::memory::MemorySaver;
    use crate::state::ToolCall;
    use crate::tool_source::MockToolSource;

    #[tokio::test]
    async fn thread_state_is_continued_with_checkpointer() {
        let llm = Arc::new(MockLlm::scripted(vec![
            LlmResponse::text("first answer"),
            LlmResponse::text("second answer"),
        ]));
        let runner = ReactRunner::builder(llm.clone(), Arc::new(MockToolSource::new()))
            .checkpointer(Arc::new(MemorySaver::new()))
            .build()
            .unwrap();
        let config = RunnableConfig::for_thread("t-1");
        runner
            .invoke_with_config("hello", Some(config.clone()))
            .await
            .unwrap();
        let state = runner
            .invoke_with_config("again", Some(config))
            .await
            .unwrap();

        assert_eq!(state.messages.len(), 4);
        assert_eq!(state.last_assistant_reply().as_deref(), Some("second answer"));
        assert_eq!(llm.seen_messages()[1].len(), 3);
    }

    #[tokio::test]
    async fn invoke_with_customer_sets_state_customer() {
        let llm = Arc::new(MockLlm::first_tools_then_end(
            vec![ToolCall::new("lookup", "{}")],
            "done",
        ));
        let tools = Arc::new(MockToolSource::new().with_tool("lookup", "row"));
        let runner = ReactRunner::builder(llm, tools.clone()).build().unwrap();
        let state = runner
            .invoke_with_customer("find", Some("3".into()))
            .await
            .unwrap();
        assert_eq!(state.customer_id.as_deref(), Some("3"));
        assert_eq!(tools.calls()[0].2.as_deref(), Some("3"));
    }
}
