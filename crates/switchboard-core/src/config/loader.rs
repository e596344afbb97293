//! Configuration loader with environment variable expansion
//!
//! Loads configuration from `.switchboard.toml` in the project root or the
//! user config directory.

use super::types::{ProviderConfig, SwitchboardConfig};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Unknown LLM provider: {0}")]
    UnknownProvider(String),

    #[error("No API key for provider '{provider}' (set {env_var} or llm.providers.{provider}.api_key)")]
    MissingCredential { provider: String, env_var: String },

    #[error("No model configured for provider '{0}'")]
    MissingModel(String),
}

/// Project-level config file name
pub const PROJECT_CONFIG_FILE: &str = ".switchboard.toml";

/// Load configuration from various sources
///
/// Priority order:
/// 1. Project-level `.switchboard.toml`
/// 2. User-level `~/.config/switchboard/config.toml`
/// 3. Default configuration
///
/// Environment overrides apply on top of whichever source wins.
pub fn load_config(project_dir: &Path) -> Result<SwitchboardConfig, ConfigError> {
    load_with(project_dir, user_config_path(), &|key| std::env::var(key).ok())
}

/// Get user config file path
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("switchboard").join("config.toml"))
}

fn load_with(
    project_dir: &Path,
    user_config: Option<PathBuf>,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<SwitchboardConfig, ConfigError> {
    let project_config = project_dir.join(PROJECT_CONFIG_FILE);
    let source = if project_config.exists() {
        Some(project_config)
    } else {
        user_config.filter(|path| path.exists())
    };

    let config = match source {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config file");
            parse_config(&std::fs::read_to_string(&path)?, env)?
        }
        None => SwitchboardConfig::default(),
    };

    Ok(apply_env_overrides(config, env))
}

/// Parse TOML content and expand `${VAR}` references
fn parse_config(
    content: &str,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<SwitchboardConfig, ConfigError> {
    let mut config: SwitchboardConfig = toml::from_str(content)?;

    for provider in config.llm.providers.values_mut() {
        if let Some(ref api_key) = provider.api_key {
            provider.api_key = Some(expand_string(api_key, env));
        }
        if let Some(ref base_url) = provider.base_url {
            provider.base_url = Some(expand_string(base_url, env));
        }
    }

    Ok(config)
}

fn env_regex() -> &'static Regex {
    static ENV_REGEX: OnceLock<Regex> = OnceLock::new();
    ENV_REGEX.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

/// Expand environment variables in a single string; unknown ones stay as-is
fn expand_string(s: &str, env: &dyn Fn(&str) -> Option<String>) -> String {
    env_regex()
        .replace_all(s, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        })
        .to_string()
}

/// Apply environment variable overrides
///
/// Supports direct environment variables:
/// - GROQ_API_KEY -> groq.api_key
/// - OPENAI_API_KEY -> openai.api_key
/// - OLLAMA_BASE_URL -> ollama.base_url
/// - SWITCHBOARD_PROVIDER -> llm.provider
/// - SWITCHBOARD_MODEL -> model of the selected provider
/// - PORT -> server.port
fn apply_env_overrides(
    mut config: SwitchboardConfig,
    env: &dyn Fn(&str) -> Option<String>,
) -> SwitchboardConfig {
    let non_empty = |key: &str| env(key).filter(|v| !v.is_empty());

    for (provider_id, env_var) in [("groq", "GROQ_API_KEY"), ("openai", "OPENAI_API_KEY")] {
        if let Some(key) = non_empty(env_var) {
            provider_entry(&mut config, provider_id).api_key = Some(key);
        }
    }

    if let Some(url) = non_empty("OLLAMA_BASE_URL") {
        provider_entry(&mut config, "ollama").base_url = Some(url);
    }

    if let Some(provider) = non_empty("SWITCHBOARD_PROVIDER") {
        config.llm.provider = provider;
    }

    if let Some(model) = non_empty("SWITCHBOARD_MODEL") {
        let selected = config.llm.provider.clone();
        provider_entry(&mut config, &selected).model = Some(model);
    }

    if let Some(port) = non_empty("PORT").and_then(|p| p.parse().ok()) {
        config.server.port = port;
    }

    config
}

fn provider_entry<'a>(config: &'a mut SwitchboardConfig, id: &str) -> &'a mut ProviderConfig {
    config
        .llm
        .providers
        .entry(id.to_string())
        .or_insert_with(ProviderConfig::default)
}

/// Create a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# Switchboard Configuration
# Place this file in your project root as .switchboard.toml
# or in ~/.config/switchboard/config.toml for global settings

[llm]
# Provider: groq, openai, ollama
provider = "groq"

# Request timeout in seconds
timeout = 120

# Sampling temperature (optional)
# temperature = 0.2

[llm.providers.groq]
api_key = "${GROQ_API_KEY}"
model = "mixtral-8x7b-32768"

[llm.providers.openai]
api_key = "${OPENAI_API_KEY}"
model = "gpt-4o-mini"

[llm.providers.ollama]
base_url = "http://localhost:11434"
model = "llama3"

[server]
host = "0.0.0.0"
port = 8000

# Override any of the role instructions
# [prompts]
# researcher = "You are a researcher. Use search tools or knowledge to answer."
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_expand_env_var() {
        let env = env_from(&[("TEST_VAR", "test_value")]);
        let result = expand_string("prefix_${TEST_VAR}_suffix", &env);
        assert_eq!(result, "prefix_test_value_suffix");
    }

    #[test]
    fn test_missing_env_var() {
        let env = env_from(&[]);
        let result = expand_string("${NONEXISTENT_VAR}", &env);
        assert_eq!(result, "${NONEXISTENT_VAR}");
    }

    #[test]
    fn test_sample_config_parses() {
        let env = env_from(&[("GROQ_API_KEY", "gsk_test")]);
        let config = parse_config(sample_config(), &env).unwrap();
        assert_eq!(config.llm.provider, "groq");
        assert_eq!(
            config.llm.providers["groq"].api_key.as_deref(),
            Some("gsk_test")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_project_file_wins_and_env_overrides_apply() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            "[llm]\nprovider = \"ollama\"\n\n[llm.providers.ollama]\nmodel = \"qwen2\"\n",
        )
        .unwrap();

        let env = env_from(&[("OLLAMA_BASE_URL", "http://gpu-box:11434"), ("PORT", "9001")]);
        let config = load_with(dir.path(), None, &env).unwrap();

        assert_eq!(config.llm.provider, "ollama");
        let ollama = &config.llm.providers["ollama"];
        assert_eq!(ollama.model.as_deref(), Some("qwen2"));
        assert_eq!(ollama.base_url.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(config.server.port, 9001);
    }

    #[test]
    fn test_defaults_when_no_file() {
        let dir = TempDir::new().unwrap();
        let env = env_from(&[
            ("GROQ_API_KEY", "gsk_live"),
            ("SWITCHBOARD_MODEL", "llama-3.1-8b-instant"),
        ]);
        let config = load_with(dir.path(), Some(dir.path().join("missing.toml")), &env).unwrap();

        let groq = &config.llm.providers["groq"];
        assert_eq!(groq.api_key.as_deref(), Some("gsk_live"));
        assert_eq!(groq.model.as_deref(), Some("llama-3.1-8b-instant"));
    }

    #[test]
    fn test_invalid_toml() {
        let env = env_from(&[]);
        assert!(matches!(
            parse_config("[llm\nprovider = ", &env),
            Err(ConfigError::ParseError(_))
        ));
    }
}
