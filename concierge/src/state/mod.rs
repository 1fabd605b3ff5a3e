//! State types for the tool-calling loop and the supervisor graph.
//!
//! One flat record flows through every node: [`AgentState`] holds the conversation,
//! the per-round tool data, and the narrow slice the supervisor forwards to sub-agents
//! (`customer_id`, `loaded_memory`).
//!
//! # Example
//!
//! ```rust
//! use concierge::{AgentState, Message};
//!
//! let mut state = AgentState::default();
//! state.messages.push(Message::user("Which albums by AC/DC do you have?"));
//! state.customer_id = Some("1".into());
//! ```

pub mod agent_state;

pub use agent_state::{AgentState, ToolCall, ToolResult};
