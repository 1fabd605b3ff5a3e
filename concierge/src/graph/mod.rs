//! State graph: nodes + edges + conditional edges, compile and invoke.
//!
//! StateGraph: add nodes and edges, compile, then invoke with state. The tool-calling
//! loop and the supervisor graph are both built on this.

mod compile_error;
mod compiled;
mod conditional;
mod logging;
mod next;
mod node;
mod run_context;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use conditional::{ConditionalRouter, ConditionalRouterFn, NextEntry};
pub use logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
};
pub use next::Next;
pub use node::Node;
pub use run_context::RunContext;
pub use state_graph::{StateGraph, END, START};
