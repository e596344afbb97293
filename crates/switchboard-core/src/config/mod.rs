//! Configuration module for Switchboard
//!
//! Handles loading and parsing of `.switchboard.toml` configuration files
//! with support for environment variable expansion.

mod loader;
mod types;

pub use loader::{load_config, sample_config, user_config_path, ConfigError, PROJECT_CONFIG_FILE};
pub use types::{LlmConfig, ProviderConfig, ProviderKind, ServerConfig, SwitchboardConfig};
