//! Load configuration from the XDG `config.toml` `[env]` table and a project `.env`, then
//! apply it to the process environment with priority **existing env > .env > XDG**.
//!
//! Values are only ever added: a variable already present in the environment is never
//! overwritten.

mod dotenv;
mod xdg_toml;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application name used for `~/.config/<app>/config.toml`.
pub const APP_NAME: &str = "concierge";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse xdg toml: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Where an applied value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    EnvFile,
    Xdg,
}

/// Keys set by a load, sorted by key.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Applied {
    pub keys: Vec<(String, Source)>,
}

/// Sets every key missing from the process env, taking the first layer that has it.
fn apply(layers: &[(Source, HashMap<String, String>)]) -> Applied {
    let mut keys: Vec<&String> = layers.iter().flat_map(|(_, m)| m.keys()).collect();
    keys.sort();
    keys.dedup();

    let mut applied = Applied::default();
    for key in keys {
        if std::env::var_os(key).is_some() {
            continue;
        }
        let Some((source, value)) = layers
            .iter()
            .find_map(|(s, m)| m.get(key).map(|v| (*s, v)))
        else {
            continue;
        };
        std::env::set_var(key, value);
        applied.keys.push((key.clone(), source));
    }
    applied
}

/// Loads `$XDG_CONFIG_HOME/<app_name>/config.toml` and `.env` (from `override_dir` or the
/// current directory) and applies them.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<Applied, LoadError> {
    let xdg = xdg_toml::load_env_map(app_name)?;
    let env_dir = override_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_default();
    let dotenv = dotenv::load_env_map(override_dir).map_err(|source| LoadError::Read {
        path: env_dir.join(".env"),
        source,
    })?;
    let applied = apply(&[(Source::EnvFile, dotenv), (Source::Xdg, xdg)]);
    tracing::debug!(keys = applied.keys.len(), "config applied");
    Ok(applied)
}

/// Applies one explicit env file (e.g. the `env` entry of a graph config). Missing file is
/// an error.
pub fn apply_env_file(path: &Path) -> Result<Applied, LoadError> {
    let map = dotenv::load_file(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(apply(&[(Source::EnvFile, map)]))
}

/// Path of the XDG config file for `app_name`, whether or not it exists.
pub fn xdg_config_path(app_name: &str) -> Option<PathBuf> {
    xdg_toml::config_path(app_name)
}

/// Serialises tests that change process-wide variables such as `XDG_CONFIG_HOME`.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
