//! Ollama LLM provider
//!
//! Connects to a local Ollama instance for chat completions.

use super::{ChatMessage, LlmError, ModelInvoker, OutputSchema};
use std::time::Duration;

/// Default Ollama endpoint
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Ollama provider for local LLM inference
pub struct OllamaProvider {
    /// Base URL for Ollama API
    base_url: String,

    /// Model to use
    model: String,

    /// Sampling temperature, model default when unset
    temperature: Option<f32>,

    /// HTTP client for API calls
    client: ureq::Agent,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            temperature: None,
            client: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    fn request_body(&self, messages: &[ChatMessage]) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages.iter().map(ChatMessage::to_api_json).collect::<Vec<_>>(),
            "stream": false
        });
        if let Some(temperature) = self.temperature {
            body["options"] = serde_json::json!({ "temperature": temperature });
        }
        body
    }

    fn chat(&self, body: &serde_json::Value) -> Result<String, LlmError> {
        let response = self
            .client
            .post(&format!("{}/api/chat", self.base_url))
            .set("Content-Type", "application/json")
            .send_json(body)?;

        let json: serde_json::Value = response.into_json()?;
        extract_content(&json)
    }
}

impl ModelInvoker for OllamaProvider {
    fn id(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.chat(&self.request_body(messages))
    }

    fn complete_structured(
        &self,
        messages: &[ChatMessage],
        schema: &OutputSchema,
    ) -> Result<serde_json::Value, LlmError> {
        let mut body = self.request_body(messages);
        body["format"] = schema.schema.clone();

        let content = self.chat(&body)?;
        parse_structured(&content)
    }
}

fn extract_content(json: &serde_json::Value) -> Result<String, LlmError> {
    if let Some(error) = json.get("error").and_then(|e| e.as_str()) {
        return Err(LlmError::Api {
            status: 500,
            message: error.to_string(),
        });
    }

    json.get("message")
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| LlmError::InvalidResponse("missing message.content".to_string()))
}

/// Parse schema-constrained content, tolerating a markdown code fence
fn parse_structured(content: &str) -> Result<serde_json::Value, LlmError> {
    let clean = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    match serde_json::from_str::<serde_json::Value>(clean) {
        Ok(value) if value.is_object() => Ok(value),
        Ok(other) => Err(LlmError::SchemaViolation(format!(
            "expected a JSON object, got {}",
            other
        ))),
        Err(e) => Err(LlmError::SchemaViolation(format!(
            "structured output is not JSON: {}",
            e
        ))),
    }
}
