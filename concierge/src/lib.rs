//! # Concierge
//!
//! Tool-calling agent loops and supervisor delegation on a small **state-in, state-out**
//! graph runtime. One state type ([`AgentState`]) flows through every node.
//!
//! ## Main modules
//!
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`], [`Next`], [`RunContext`]:
//!   build and run state graphs with conditional edges and a per-run step limit.
//! - [`agent`]: [`agent::react`], the think → act → observe loop ([`ReactRunner`]), its
//!   routing predicates ([`tools_condition`], [`done_condition`]) and [`AgentTool`] for
//!   exposing a loop as a tool.
//! - [`llm`]: [`LlmClient`], [`MockLlm`], [`ChatOpenAI`], [`ModelConfig`].
//! - [`tool_source`] / [`tools`]: [`ToolSource`], [`Tool`], [`AggregateToolSource`].
//! - [`memory`]: [`Checkpointer`] ([`MemorySaver`]), [`Store`] ([`InMemoryStore`]), [`RunnableConfig`].
//! - [`demo`]: the email assistant and the music-store supervisor over the Chinook database.
//! - [`registry`]: named graphs from a `concierge.json` ([`GraphsConfig`], [`GraphRegistry`]).
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use concierge::{MockLlm, MockToolSource, ReactRunner};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let llm = Arc::new(MockLlm::with_no_tool_calls("Hello!"));
//! let runner = ReactRunner::builder(llm, Arc::new(MockToolSource::new()))
//!     .build()
//!     .unwrap();
//! let state = runner.invoke("hi").await.unwrap();
//! assert_eq!(state.last_assistant_reply().as_deref(), Some("Hello!"));
//! # }
//! ```

pub mod agent;
pub mod demo;
pub mod error;
pub mod graph;
pub mod llm;
pub mod memory;
pub mod message;
pub mod registry;
pub mod runner_common;
pub mod state;
pub mod tool_source;
pub mod tools;

pub use agent::react::{
    done_condition, tools_condition, ActNode, AgentTool, HandleToolErrors, LoopExit,
    ObserveNode, ReactRunner, ReactRunnerBuilder, RunError, ThinkNode, DONE_TOOL,
};
pub use error::AgentError;
pub use graph::{
    CompilationError, CompiledStateGraph, Next, Node, RunContext, StateGraph, END, START,
};
pub use llm::{
    openai_factory, ChatOpenAI, LlmClient, LlmFactory, LlmResponse, LlmUsage, MockLlm,
    ModelConfig, ToolChoiceMode,
};
pub use memory::{
    Checkpoint, CheckpointError, Checkpointer, InMemoryStore, MemorySaver, RunnableConfig, Store,
};
pub use message::Message;
pub use registry::{AgentGraph, GraphBuilder, GraphDeps, GraphRegistry, GraphsConfig, RegistryError};
pub use state::{AgentState, ToolCall, ToolResult};
pub use tool_source::{MockToolSource, ToolCallContext, ToolSource, ToolSourceError, ToolSpec};
pub use tools::{AggregateToolSource, Tool};

#[cfg(test)]
mod test_logging {
    use tracing_subscriber::EnvFilter;

    #[ctor::ctor]
    fn init() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
}
