//! Music-store demo over the Chinook sample database.
//!
//! - [`ChinookDb`]: the database, loaded in memory and read-only.
//! - Catalog and invoice tools, each wrapped in its own sub-agent.
//! - [`build_music_store`]: verification, long-term memory and a supervisor that
//!   delegates to the sub-agents.

pub mod catalog;
pub mod db;
pub mod invoice;
pub mod memory;
pub mod supervisor;
pub mod verify;

pub use catalog::catalog_tools;
pub use db::{ChinookDb, ChinookError, CustomerIdentifier, DEFAULT_CHINOOK_SQL_URL, ENV_CHINOOK_SQL_URL};
pub use invoice::invoice_tools;
pub use memory::{CreateMemoryNode, LoadMemoryNode, UserProfile};
pub use supervisor::{
    build_music_store, invoice_information_subagent, music_catalog_subagent, MusicStoreGraph,
    SupervisorNode,
};
pub use verify::VerifyInfoNode;

use serde_json::Value;

use crate::tool_source::{ToolCallContent, ToolSpec};

fn spec(name: &str, description: &str, input_schema: Value) -> ToolSpec {
    ToolSpec {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema,
    }
}

/// Rows as a JSON array, or `empty` when there are none.
fn rows_content(rows: Vec<db::Row>, empty: &str) -> ToolCallContent {
    if rows.is_empty() {
        return ToolCallContent::text(empty);
    }
    let rows: Vec<Value> = rows.into_iter().map(Value::Object).collect();
    ToolCallContent::text(Value::Array(rows).to_string())
}

#[cfg(test)]
pub(crate) fn fixture_db() -> ChinookDb {
    ChinookDb::from_script(include_str!("../../../tests/fixtures/chinook_min.sql"))
        .expect("fixture loads")
}
