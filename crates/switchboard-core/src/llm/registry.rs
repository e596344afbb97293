//! Provider selection from configuration

use super::{OllamaProvider, OpenAiCompatible, SharedInvoker, OLLAMA_BASE_URL};
use crate::config::{ConfigError, ProviderKind, SwitchboardConfig};
use std::sync::Arc;

/// Build the invoker for the configured provider.
///
/// Validates the configuration first, so a missing API key surfaces here
/// rather than on the first request.
pub fn build_invoker(config: &SwitchboardConfig) -> Result<SharedInvoker, ConfigError> {
    let kind = config.validate()?;
    let provider = config
        .llm
        .selected()
        .ok_or_else(|| ConfigError::UnknownProvider(config.llm.provider.clone()))?;

    let model = provider.model.as_deref().unwrap_or_default();
    let api_key = provider.api_key.as_deref().unwrap_or_default();
    let timeout = config.llm.timeout();
    let temperature = config.llm.temperature;

    let invoker: SharedInvoker = match kind {
        ProviderKind::Groq | ProviderKind::OpenAi => {
            let mut openai = match kind {
                ProviderKind::Groq => OpenAiCompatible::groq(api_key, model, timeout),
                _ => OpenAiCompatible::new(&config.llm.provider, api_key, model, timeout),
            };
            if let Some(url) = provider.base_url.as_deref() {
                openai = openai.with_base_url(url);
            }
            Arc::new(openai.with_temperature(temperature))
        }
        ProviderKind::Ollama => {
            let base_url = provider.base_url.as_deref().unwrap_or(OLLAMA_BASE_URL);
            Arc::new(OllamaProvider::new(base_url, model, timeout).with_temperature(temperature))
        }
    };

    tracing::info!(provider = invoker.id(), model = invoker.model(), "model invoker ready");
    Ok(invoker)
}
