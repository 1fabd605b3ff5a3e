//! Tools: the `Tool` trait, a name-keyed `ToolRegistry` and `AggregateToolSource`,
//! which exposes a registry as a `ToolSource`.
//!
//! Domain tools live next to the agents that use them (`demo::email`, `demo::chinook`);
//! `AgentTool` (in `agent::react`) turns a whole tool-calling loop into a `Tool`.

mod aggregate_source;
mod registry;
mod r#trait;

pub use aggregate_source::AggregateToolSource;
pub use r#trait::Tool;
pub use registry::ToolRegistry;

use crate::tool_source::ToolSourceError;

/// Reads a required string argument.
pub(crate) fn required_str<'a>(
    args: &'a serde_json::Value,
    key: &str,
) -> Result<&'a str, ToolSourceError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolSourceError::InvalidInput(format!("missing {}", key)))
}
