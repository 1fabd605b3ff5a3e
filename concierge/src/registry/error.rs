use std::path::PathBuf;

use thiserror::Error;

use crate::graph::CompilationError;

/// Errors from loading the graph config or building graphs from it.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse graph config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("graph config lists no graphs")]
    NoGraphs,
    #[error("unknown graph: {0}")]
    UnknownGraph(String),
    #[error("graph {0} needs the Chinook database, but none was loaded")]
    MissingChinook(String),
    #[error("build graph: {0}")]
    Compilation(#[from] CompilationError),
}
