//! Agents built on the state graph.
//!
//! [`react`] holds the tool-calling loop (Think → Act → Observe), its routing
//! predicates and [`react::AgentTool`], which exposes a whole loop as a tool so a
//! supervisor can delegate to it.

pub mod react;
