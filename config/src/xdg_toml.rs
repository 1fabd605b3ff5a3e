//! `[env]` table from `$XDG_CONFIG_HOME/<app>/config.toml` (falls back to the platform
//! config directory when `XDG_CONFIG_HOME` is unset).

use std::collections::HashMap;
use std::path::PathBuf;

use crate::LoadError;

pub(crate) fn config_path(app_name: &str) -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)?;
    Some(base.join(app_name).join("config.toml"))
}

#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    env: HashMap<String, toml::Value>,
}

fn value_to_string(value: toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Scalar entries of the `[env]` table. Missing file or section gives an empty map; arrays
/// and tables are skipped.
pub fn load_env_map(app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    let Some(path) = config_path(app_name).filter(|p| p.is_file()) else {
        return Ok(HashMap::new());
    };
    let content = std::fs::read_to_string(&path).map_err(|source| LoadError::Read {
        path: path.clone(),
        source,
    })?;
    let config: ConfigFile = toml::from_str(&content)?;
    let mut out = HashMap::with_capacity(config.env.len());
    for (key, value) in config.env {
        match value_to_string(value) {
            Some(v) => {
                out.insert(key, v);
            }
            None => tracing::warn!(key = %key, path = %path.display(), "ignoring non-scalar [env] value"),
        }
    }
    Ok(out)
}
