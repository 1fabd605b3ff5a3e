//! Library side of the `concierge` binary: config loading, registry setup and one-turn runs.
//!
//! `main.rs` only parses arguments and prints; everything here is reachable from tests.

pub mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use concierge::demo::chinook::{ChinookDb, ChinookError};
use concierge::{
    openai_factory, GraphDeps, GraphRegistry, GraphsConfig, LlmClient, LlmFactory, Message,
    MockLlm, ModelConfig, RegistryError, RunError, RunnableConfig, ToolChoiceMode, ToolSpec,
};
use thiserror::Error;

/// Name of the graph config file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "concierge.json";

/// Reply of the offline model used when no provider key is configured.
pub const OFFLINE_REPLY: &str =
    "No model is configured. Set OPENAI_API_KEY to talk to a real model.";

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config: {0}")]
    Config(#[from] config::LoadError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("chinook: {0}")]
    Chinook(#[from] ChinookError),
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("run failed: {0}")]
    Run(#[from] RunError),
    #[error("list tools: {0}")]
    Tools(String),
}

/// Options shared by every subcommand that needs graphs.
#[derive(Debug, Clone, Default)]
pub struct Setup {
    /// Graph config file; `concierge.json` in the current directory when present.
    pub config: Option<PathBuf>,
    /// Local Chinook SQL script; skips the download.
    pub chinook_sql: Option<PathBuf>,
}

/// Env var naming a local Chinook SQL script, read when `--chinook-sql` is absent.
pub const ENV_CHINOOK_SQL_PATH: &str = "CHINOOK_SQL_PATH";

/// Applies `.env` (current directory) and the XDG config to the process environment.
/// Runs before logging is set up, so `RUST_LOG` and `LOG_FILE` may come from either file.
pub fn load_env() -> Result<config::Applied, CliError> {
    Ok(config::load_and_apply(config::APP_NAME, None)?)
}

/// Loads the graph config and applies its `env` file.
pub fn load_graphs_config(setup: &Setup) -> Result<GraphsConfig, CliError> {
    let path = setup.config.clone().or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_FILE);
        default.exists().then_some(default)
    });
    let graphs = GraphsConfig::load_or_default(path.as_deref())?;
    if let Some(env) = &graphs.env {
        config::apply_env_file(env)?;
    }
    Ok(graphs)
}

/// OpenAI when `OPENAI_API_KEY` is set, otherwise a canned offline model.
pub fn llm_factory_from_env() -> LlmFactory {
    if std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.trim().is_empty()) {
        return openai_factory(ModelConfig::from_env());
    }
    tracing::warn!("OPENAI_API_KEY not set, using offline model");
    Arc::new(|_tools: &[ToolSpec], _mode: ToolChoiceMode| {
        let llm: Arc<dyn LlmClient> = Arc::new(MockLlm::with_no_tool_calls(OFFLINE_REPLY));
        llm
    })
}

async fn load_chinook(script: Option<&Path>) -> Result<ChinookDb, CliError> {
    let from_env = std::env::var_os(ENV_CHINOOK_SQL_PATH).map(PathBuf::from);
    match script.or(from_env.as_deref()) {
        Some(path) => {
            let sql = std::fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(ChinookDb::from_script(&sql)?)
        }
        None => Ok(ChinookDb::fetch_default().await?),
    }
}

/// Builds every configured graph. The demo database is loaded only when a graph needs it.
pub async fn build_registry(
    graphs: &GraphsConfig,
    setup: &Setup,
    llm: LlmFactory,
) -> Result<GraphRegistry, CliError> {
    let mut deps = GraphDeps::new(llm);
    if graphs.needs_chinook() {
        deps = deps.with_chinook(load_chinook(setup.chinook_sql.as_deref()).await?);
    }
    Ok(GraphRegistry::build(graphs, &deps)?)
}

/// One turn of a conversation.
#[derive(Debug, Clone, Default)]
pub struct Turn {
    pub graph: String,
    pub message: String,
    pub thread_id: Option<String>,
    pub customer_id: Option<String>,
}

/// Runs a turn and returns the last non-empty assistant reply (empty when none).
pub async fn run_turn(registry: &GraphRegistry, turn: &Turn) -> Result<String, CliError> {
    let graph = registry.get(&turn.graph)?;
    let config = RunnableConfig {
        thread_id: turn.thread_id.clone(),
        customer_id: turn.customer_id.clone(),
        ..RunnableConfig::default()
    };
    let state = graph.run(vec![Message::user(&turn.message)], config).await?;
    Ok(state.last_nonempty_reply().unwrap_or_default())
}

/// Tools of one graph, sorted by name.
pub async fn list_tools(registry: &GraphRegistry, graph: &str) -> Result<Vec<ToolSpec>, CliError> {
    let mut tools = registry
        .get(graph)?
        .list_tools()
        .await
        .map_err(|e| CliError::Tools(e.to_string()))?;
    tools.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(tools)
}

/// `name  description` lines, names padded to the longest.
pub fn format_tools(tools: &[ToolSpec]) -> String {
    let width = tools.iter().map(|t| t.name.len()).max().unwrap_or(0);
    tools
        .iter()
        .map(|t| {
            format!(
                "{:<width$}  {}",
                t.name,
                t.description.as_deref().unwrap_or(""),
                width = width
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
