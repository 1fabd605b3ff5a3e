//! Music-store supervisor graph and its two sub-agents.
//!
//! ```text
//! START → verify_info ─(verified)→ load_memory → supervisor → create_memory → END
//!                     └(unverified)→ END
//! ```
//!
//! The supervisor is itself a tool-calling loop whose only tools are the catalog and
//! invoice sub-agents, exposed through `AgentTool`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::agent::react::{HandleToolErrors, ReactRunner, RunError};
use crate::error::AgentError;
use crate::graph::{CompilationError, CompiledStateGraph, Next, Node, RunContext, StateGraph, END, START};
use crate::llm::{LlmFactory, ToolChoiceMode};
use crate::memory::{Checkpointer, RunnableConfig, Store};
use crate::message::Message;
use crate::runner_common::load_thread;
use crate::state::AgentState;
use crate::tool_source::{ToolSourceError, ToolSpec};
use crate::tools::AggregateToolSource;

use super::catalog::catalog_tools;
use super::db::ChinookDb;
use super::invoice::invoice_tools;
use super::memory::{CreateMemoryNode, LoadMemoryNode};
use super::verify::VerifyInfoNode;

pub const MUSIC_CATALOG_AGENT: &str = "music_catalog_subagent";
pub const INVOICE_AGENT: &str = "invoice_information_subagent";

pub const MUSIC_CATALOG_PROMPT: &str = "You are a member of the assistant team for a digital \
music store, specialised in the music catalog: albums, tracks, artists and genres. Use the \
tools to look things up and answer only from their results. If nothing matches, say so and \
suggest something close. When the customer's preferences are known, use them to make \
recommendations.";

pub const INVOICE_PROMPT: &str = "You are a member of the assistant team for a digital music \
store, specialised in invoices and purchases. Use the tools to retrieve invoices, their line \
items and the support employee responsible for a purchase. The customer's id is usually \
provided; only ask for it when it is missing.";

pub const SUPERVISOR_PROMPT: &str = "You are an expert customer support assistant for a \
digital music store. Your team has two sub-agents:\n\
1. music_catalog_subagent: knows the store's catalog of albums, tracks, artists and genres, \
and can recommend music from the customer's preferences.\n\
2. invoice_information_subagent: retrieves past purchases, invoice details and the employee \
who handled a purchase.\n\
Delegate each part of the customer's request to the right sub-agent with a self-contained \
task, then answer the customer from their results. Answer directly when no delegation is \
needed.";

/// Catalog sub-agent: the four catalog tools behind a tool-calling loop.
pub fn music_catalog_subagent(
    llm: &LlmFactory,
    db: &ChinookDb,
) -> Result<ReactRunner, CompilationError> {
    let tools = catalog_tools(db);
    let client = llm(&tools.specs(), ToolChoiceMode::Auto);
    ReactRunner::builder(client, Arc::new(tools))
        .system_prompt(MUSIC_CATALOG_PROMPT)
        .handle_tool_errors(HandleToolErrors::Always(None))
        .name(MUSIC_CATALOG_AGENT)
        .description(
            "Answers questions about the music catalog (albums, tracks, artists, genres) \
             and recommends music.",
        )
        .build()
}

/// Invoice sub-agent: the three invoice tools, scoped to the forwarded customer.
pub fn invoice_information_subagent(
    llm: &LlmFactory,
    db: &ChinookDb,
) -> Result<ReactRunner, CompilationError> {
    let tools = invoice_tools(db);
    let client = llm(&tools.specs(), ToolChoiceMode::Auto);
    ReactRunner::builder(client, Arc::new(tools))
        .system_prompt(INVOICE_PROMPT)
        .handle_tool_errors(HandleToolErrors::Always(None))
        .name(INVOICE_AGENT)
        .description(
            "Retrieves the verified customer's invoices, purchase details and support employee.",
        )
        .build()
}

/// Supervisor loop whose tools are the two sub-agents.
pub fn supervisor_runner(llm: &LlmFactory, db: &ChinookDb) -> Result<ReactRunner, CompilationError> {
    let tools = AggregateToolSource::new()
        .with_tool(Box::new(music_catalog_subagent(llm, db)?.as_tool()))
        .with_tool(Box::new(invoice_information_subagent(llm, db)?.as_tool()));
    let client = llm(&tools.specs(), ToolChoiceMode::Auto);
    ReactRunner::builder(client, Arc::new(tools))
        .system_prompt(SUPERVISOR_PROMPT)
        .handle_tool_errors(HandleToolErrors::Always(None))
        .name("supervisor")
        .build()
}

/// Runs the supervisor loop on the outer graph's state.
pub struct SupervisorNode {
    runner: Arc<ReactRunner>,
}

impl SupervisorNode {
    pub fn new(runner: Arc<ReactRunner>) -> Self {
        Self { runner }
    }

    async fn delegate(
        &self,
        state: AgentState,
        config: Option<RunnableConfig>,
    ) -> Result<(AgentState, Next), AgentError> {
        let config = config.map(|mut c| {
            c.customer_id = state.customer_id.clone();
            c
        });
        match self.runner.invoke_state(state, config).await {
            Ok(state) => Ok((state, Next::Continue)),
            Err(RunError::Execution(e)) => Err(e),
            Err(e) => Err(AgentError::ExecutionFailed(e.to_string())),
        }
    }
}

#[async_trait]
impl Node<AgentState> for SupervisorNode {
    fn id(&self) -> &str {
        "supervisor"
    }

    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        self.delegate(state, None).await
    }

    async fn run_with_context(
        &self,
        state: AgentState,
        ctx: &RunContext,
    ) -> Result<(AgentState, Next), AgentError> {
        self.delegate(state, Some(ctx.config.clone())).await
    }
}

/// The compiled music-store graph plus the checkpointer it continues threads from.
pub struct MusicStoreGraph {
    compiled: CompiledStateGraph<AgentState>,
    supervisor: Arc<ReactRunner>,
    checkpointer: Option<Arc<dyn Checkpointer<AgentState>>>,
}

impl MusicStoreGraph {
    /// Tools the supervisor can call (the two sub-agents).
    pub async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        self.supervisor.list_tools().await
    }

    /// Runs one customer turn with the default config (no thread).
    pub async fn invoke(&self, user_message: &str) -> Result<AgentState, RunError> {
        self.invoke_with_config(user_message, None).await
    }

    /// Runs one customer turn, continuing the saved thread when `thread_id` is set.
    pub async fn invoke_with_config(
        &self,
        user_message: &str,
        config: Option<RunnableConfig>,
    ) -> Result<AgentState, RunError> {
        self.invoke_messages(vec![Message::user(user_message)], config)
            .await
    }

    pub async fn invoke_messages(
        &self,
        input: Vec<Message>,
        config: Option<RunnableConfig>,
    ) -> Result<AgentState, RunError> {
        let config = config.unwrap_or_default();
        // verify_info checks config.customer_id against the database before it counts.
        let state = load_thread(self.checkpointer.as_deref(), &config, input).await?;
        self.invoke_state(state, Some(config)).await
    }

    pub async fn invoke_state(
        &self,
        state: AgentState,
        config: Option<RunnableConfig>,
    ) -> Result<AgentState, RunError> {
        Ok(self.compiled.invoke(state, config).await?)
    }
}

/// Builds the `music_store` graph.
pub fn build_music_store(
    llm: &LlmFactory,
    db: &ChinookDb,
    store: Arc<dyn Store>,
    checkpointer: Option<Arc<dyn Checkpointer<AgentState>>>,
) -> Result<MusicStoreGraph, CompilationError> {
    let supervisor_loop = Arc::new(supervisor_runner(llm, db)?);
    let supervisor = SupervisorNode::new(Arc::clone(&supervisor_loop));
    let memory_llm = llm(&[], ToolChoiceMode::None);

    let path_map: HashMap<String, String> = [
        ("verified".into(), "load_memory".into()),
        (END.into(), END.into()),
    ]
    .into_iter()
    .collect();

    let mut graph = StateGraph::<AgentState>::new();
    graph
        .add_node("verify_info", Arc::new(VerifyInfoNode::new(db.clone())))
        .add_node("load_memory", Arc::new(LoadMemoryNode::new(Arc::clone(&store))))
        .add_node("supervisor", Arc::new(supervisor))
        .add_node("create_memory", Arc::new(CreateMemoryNode::new(memory_llm, store)))
        .add_edge(START, "verify_info")
        .add_conditional_edges(
            "verify_info",
            Arc::new(|state: &AgentState| {
                if state.customer_id.is_some() {
                    "verified".to_string()
                } else {
                    END.to_string()
                }
            }),
            Some(path_map),
        )
        .add_edge("load_memory", "supervisor")
        .add_edge("supervisor", "create_memory")
        .add_edge("create_memory", END);

    let compiled = match &checkpointer {
        Some(cp) => graph.compile_with_checkpointer(Arc::clone(cp))?,
        None => graph.compile()?,
    };
    Ok(MusicStoreGraph {
        compiled,
        supervisor: supervisor_loop,
        checkpointer,
    })
}
