//! Configuration types for Switchboard
//!
//! Defines the structure of `.switchboard.toml` configuration.

use super::ConfigError;
use crate::workflow::Prompts;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwitchboardConfig {
    /// LLM configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// System instructions for the three roles
    #[serde(default)]
    pub prompts: Prompts,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// LLM configuration section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider to use (groq, openai, ollama)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Sampling temperature; provider default when unset
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Provider configurations
    #[serde(default = "default_providers")]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "groq".to_string()
}

fn default_timeout() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            timeout: default_timeout(),
            temperature: None,
            providers: default_providers(),
        }
    }
}

impl LlmConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Config of the selected provider
    pub fn selected(&self) -> Option<&ProviderConfig> {
        self.providers.get(&self.provider)
    }
}

/// Individual provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key (supports ${ENV_VAR} syntax)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL for the API
    #[serde(default)]
    pub base_url: Option<String>,

    /// Model for this provider
    #[serde(default)]
    pub model: Option<String>,
}

/// Supported provider families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Groq,
    OpenAi,
    Ollama,
}

impl ProviderKind {
    /// Whether calls need an API key
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderKind::Ollama)
    }

    /// Environment variable that supplies the API key
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Groq => Some("GROQ_API_KEY"),
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Ollama => None,
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "openai" => Ok(ProviderKind::OpenAi),
            "ollama" => Ok(ProviderKind::Ollama),
            _ => Err(ConfigError::UnknownProvider(s.to_string())),
        }
    }
}

/// HTTP server section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Create default provider configurations
fn default_providers() -> HashMap<String, ProviderConfig> {
    let mut providers = HashMap::new();

    // Groq - requires API key
    providers.insert(
        "groq".to_string(),
        ProviderConfig {
            api_key: None,
            base_url: Some(crate::llm::GROQ_BASE_URL.to_string()),
            model: Some("mixtral-8x7b-32768".to_string()),
        },
    );

    // OpenAI - requires API key
    providers.insert(
        "openai".to_string(),
        ProviderConfig {
            api_key: None,
            base_url: Some(crate::llm::OPENAI_BASE_URL.to_string()),
            model: Some("gpt-4o-mini".to_string()),
        },
    );

    // Ollama - local, no API key needed
    providers.insert(
        "ollama".to_string(),
        ProviderConfig {
            api_key: None,
            base_url: Some(crate::llm::OLLAMA_BASE_URL.to_string()),
            model: Some("llama3".to_string()),
        },
    );

    providers
}

impl SwitchboardConfig {
    /// Check that the selected provider can be constructed.
    ///
    /// Runs once at startup; a failure here means no workflow may run.
    pub fn validate(&self) -> Result<ProviderKind, ConfigError> {
        let kind: ProviderKind = self.llm.provider.parse()?;
        let provider = self
            .llm
            .selected()
            .ok_or_else(|| ConfigError::UnknownProvider(self.llm.provider.clone()))?;

        if kind.requires_api_key() {
            let usable = provider
                .api_key
                .as_deref()
                .map(|key| !key.trim().is_empty() && !key.contains("${"))
                .unwrap_or(false);
            if !usable {
                return Err(ConfigError::MissingCredential {
                    provider: self.llm.provider.clone(),
                    env_var: kind.api_key_env().unwrap_or_default().to_string(),
                });
            }
        }

        if provider.model.as_deref().map(str::is_empty).unwrap_or(true) {
            return Err(ConfigError::MissingModel(self.llm.provider.clone()));
        }

        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SwitchboardConfig::default();
        assert_eq!(config.llm.provider, "groq");
        assert_eq!(config.server.port, 8000);
        assert_eq!(
            config.llm.selected().and_then(|p| p.model.as_deref()),
            Some("mixtral-8x7b-32768")
        );
    }

    #[test]
    fn test_validate_requires_api_key_for_hosted_provider() {
        let config = SwitchboardConfig::default();
        match config.validate() {
            Err(ConfigError::MissingCredential { provider, env_var }) => {
                assert_eq!(provider, "groq");
                assert_eq!(env_var, "GROQ_API_KEY");
            }
            other => panic!("expected missing credential, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_unexpanded_key() {
        let mut config = SwitchboardConfig::default();
        config.llm.provider = "openai".to_string();
        config.llm.providers.get_mut("openai").unwrap().api_key =
            Some("${OPENAI_API_KEY}".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCredential { .. })
        ));
    }

    #[test]
    fn test_validate_ollama_without_key() {
        let mut config = SwitchboardConfig::default();
        config.llm.provider = "ollama".to_string();
        assert_eq!(config.validate().unwrap(), ProviderKind::Ollama);
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = SwitchboardConfig::default();
        config.llm.provider = "palm".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownProvider(_))
        ));
    }
}
