//! Model selection: model name, temperature and tool choice.
//!
//! Read from `CONCIERGE_MODEL` / `CONCIERGE_TEMPERATURE` after the config crate has
//! loaded `.env` and the XDG config into the process environment.

use super::ToolChoiceMode;

pub const ENV_MODEL: &str = "CONCIERGE_MODEL";
pub const ENV_TEMPERATURE: &str = "CONCIERGE_TEMPERATURE";

const DEFAULT_MODEL: &str = "gpt-4o";

/// Which model to call and how.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
    pub model: String,
    pub temperature: f32,
    pub tool_choice: ToolChoiceMode,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            tool_choice: ToolChoiceMode::Auto,
        }
    }
}

impl ModelConfig {
    /// Reads model and temperature from the environment, falling back to defaults.
    /// An unparseable temperature is logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub(crate) fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(model) = get(ENV_MODEL).filter(|m| !m.trim().is_empty()) {
            cfg.model = model.trim().to_string();
        }
        if let Some(raw) = get(ENV_TEMPERATURE) {
            match raw.trim().parse::<f32>() {
                Ok(t) => cfg.temperature = t,
                Err(_) => tracing::warn!(value = %raw, "ignoring invalid {}", ENV_TEMPERATURE),
            }
        }
        cfg
    }

    /// Same model, with the given tool choice (builder).
    pub fn with_tool_choice(mut self, tool_choice: ToolChoiceMode) -> Self {
        self.tool_choice = tool_choice;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ModelConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, ModelConfig::default());
        assert_eq!(cfg.model, "gpt-4o");
        assert_eq!(cfg.temperature, 0.0);
    }

    #[test]
    fn reads_model_and_temperature() {
        let cfg = ModelConfig::from_lookup(lookup(&[
            (ENV_MODEL, "gpt-4o-mini"),
            (ENV_TEMPERATURE, "0.7"),
        ]));
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert!((cfg.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn invalid_temperature_keeps_default() {
        let cfg = ModelConfig::from_lookup(lookup(&[(ENV_TEMPERATURE, "warm")]));
        assert_eq!(cfg.temperature, 0.0);
    }
}
