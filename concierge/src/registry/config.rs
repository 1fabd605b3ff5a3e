//! Graph configuration file (`concierge.json`).
//!
//! ```json
//! {
//!   "graphs": {
//!     "email_assistant": "email_assistant",
//!     "music_store": "music_store"
//!   },
//!   "env": ".env"
//! }
//! ```
//!
//! Keys are the names graphs are served and run under; values pick the builder.
//! `env` is an optional dotenv file, relative to the config file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::RegistryError;

/// Which graph a configured name builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphBuilder {
    EmailAssistant,
    MusicStore,
}

impl GraphBuilder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmailAssistant => "email_assistant",
            Self::MusicStore => "music_store",
        }
    }

    /// True when the graph queries the Chinook database.
    pub fn needs_chinook(self) -> bool {
        matches!(self, Self::MusicStore)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphsConfig {
    pub graphs: BTreeMap<String, GraphBuilder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<PathBuf>,
}

impl Default for GraphsConfig {
    fn default() -> Self {
        Self::default_graphs()
    }
}

impl GraphsConfig {
    /// Both demo graphs under their builder names.
    pub fn default_graphs() -> Self {
        let graphs = [GraphBuilder::EmailAssistant, GraphBuilder::MusicStore]
            .into_iter()
            .map(|b| (b.as_str().to_string(), b))
            .collect();
        Self { graphs, env: None }
    }

    /// Reads and validates a config file. A relative `env` path is resolved against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = serde_json::from_str(&text)?;
        if config.graphs.is_empty() {
            return Err(RegistryError::NoGraphs);
        }
        if let Some(env) = config.env.as_mut() {
            if env.is_relative() {
                if let Some(dir) = path.parent() {
                    *env = dir.join(&*env);
                }
            }
        }
        tracing::debug!(path = %path.display(), graphs = config.graphs.len(), "graph config loaded");
        Ok(config)
    }

    /// Loads `path` when given, otherwise [`GraphsConfig::default_graphs`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, RegistryError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default_graphs()),
        }
    }

    /// True when any configured graph needs the Chinook database.
    pub fn needs_chinook(&self) -> bool {
        self.graphs.values().any(|b| b.needs_chinook())
    }
}
