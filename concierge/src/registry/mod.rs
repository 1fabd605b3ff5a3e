//! Named graphs built from a [`GraphsConfig`] and shared dependencies.
//!
//! The CLI and the server resolve a graph name into an [`AgentGraph`] here. All graphs
//! share one store and one checkpointer, so a thread's saved state can be read back
//! (`GET /threads/{id}/state`) without knowing which graph produced it.

mod config;
mod error;

pub use config::{GraphBuilder, GraphsConfig};
pub use error::RegistryError;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::agent::react::{ReactRunner, RunError};
use crate::demo::chinook::{build_music_store, ChinookDb, MusicStoreGraph};
use crate::demo::email::email_assistant_builder;
use crate::llm::LlmFactory;
use crate::memory::{Checkpointer, InMemoryStore, MemorySaver, RunnableConfig, Store};
use crate::message::Message;
use crate::state::AgentState;
use crate::tool_source::{ToolSourceError, ToolSpec};

/// What graphs are built from.
#[derive(Clone)]
pub struct GraphDeps {
    pub llm: LlmFactory,
    pub chinook: Option<ChinookDb>,
    pub store: Arc<dyn Store>,
    pub checkpointer: Arc<dyn Checkpointer<AgentState>>,
}

impl GraphDeps {
    /// In-memory store and checkpointer, no database.
    pub fn new(llm: LlmFactory) -> Self {
        Self {
            llm,
            chinook: None,
            store: Arc::new(InMemoryStore::new()),
            checkpointer: Arc::new(MemorySaver::new()),
        }
    }

    pub fn with_chinook(mut self, db: ChinookDb) -> Self {
        self.chinook = Some(db);
        self
    }
}

/// A runnable graph.
pub enum AgentGraph {
    React(ReactRunner),
    MusicStore(MusicStoreGraph),
}

impl AgentGraph {
    /// Runs one turn; continues the thread when `config.thread_id` is set.
    pub async fn run(
        &self,
        input: Vec<Message>,
        config: RunnableConfig,
    ) -> Result<AgentState, RunError> {
        match self {
            Self::React(runner) => runner.invoke_messages(input, Some(config)).await,
            Self::MusicStore(graph) => graph.invoke_messages(input, Some(config)).await,
        }
    }

    /// Tools the graph's top-level model can call.
    pub async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        match self {
            Self::React(runner) => runner.list_tools().await,
            Self::MusicStore(graph) => graph.list_tools().await,
        }
    }
}

struct Entry {
    builder: GraphBuilder,
    graph: Arc<AgentGraph>,
}

/// Graphs by configured name.
pub struct GraphRegistry {
    graphs: BTreeMap<String, Entry>,
    checkpointer: Arc<dyn Checkpointer<AgentState>>,
}

impl GraphRegistry {
    /// Builds every configured graph up front so configuration errors surface at startup.
    pub fn build(config: &GraphsConfig, deps: &GraphDeps) -> Result<Self, RegistryError> {
        let mut graphs = BTreeMap::new();
        for (name, builder) in &config.graphs {
            let graph = build_graph(name, *builder, deps)?;
            tracing::info!(graph = %name, builder = builder.as_str(), "graph built");
            graphs.insert(
                name.clone(),
                Entry {
                    builder: *builder,
                    graph: Arc::new(graph),
                },
            );
        }
        Ok(Self {
            graphs,
            checkpointer: Arc::clone(&deps.checkpointer),
        })
    }

    pub fn get(&self, name: &str) -> Result<Arc<AgentGraph>, RegistryError> {
        self.graphs
            .get(name)
            .map(|e| Arc::clone(&e.graph))
            .ok_or_else(|| RegistryError::UnknownGraph(name.to_string()))
    }

    /// `(name, builder)` pairs, ordered by name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, GraphBuilder)> {
        self.graphs.iter().map(|(n, e)| (n.as_str(), e.builder))
    }

    /// Saved state of a thread, if any.
    pub async fn thread_state(
        &self,
        thread_id: &str,
    ) -> Result<Option<AgentState>, crate::memory::CheckpointError> {
        let config = RunnableConfig::for_thread(thread_id);
        Ok(self.checkpointer.get(&config).await?.map(|c| c.state))
    }
}

fn build_graph(
    name: &str,
    builder: GraphBuilder,
    deps: &GraphDeps,
) -> Result<AgentGraph, RegistryError> {
    match builder {
        GraphBuilder::EmailAssistant => Ok(AgentGraph::React(
            email_assistant_builder(&deps.llm)
                .checkpointer(Arc::clone(&deps.checkpointer))
                .build()?,
        )),
        GraphBuilder::MusicStore => {
            let db = deps
                .chinook
                .as_ref()
                .ok_or_else(|| RegistryError::MissingChinook(name.to_string()))?;
            Ok(AgentGraph::MusicStore(build_music_store(
                &deps.llm,
                db,
                Arc::clone(&deps.store),
                Some(Arc::clone(&deps.checkpointer)),
            )?))
        }
    }
}
