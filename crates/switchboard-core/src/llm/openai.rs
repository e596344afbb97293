//! OpenAI-compatible LLM provider
//!
//! Talks to any `/chat/completions` endpoint: Groq (the default), OpenAI,
//! or a local proxy.

use super::{ChatMessage, LlmError, ModelInvoker, OutputSchema};
use std::time::Duration;

/// Default Groq endpoint
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default OpenAI endpoint
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible provider
pub struct OpenAiCompatible {
    /// Provider ID ("groq", "openai")
    id: String,

    /// API key
    api_key: String,

    /// Base URL for the API
    base_url: String,

    /// Model used for every call
    model: String,

    /// Sampling temperature, provider default when unset
    temperature: Option<f32>,

    /// HTTP client for API calls
    client: ureq::Agent,
}

impl OpenAiCompatible {
    /// Create a new provider
    pub fn new(id: &str, api_key: &str, model: &str, timeout: Duration) -> Self {
        Self {
            id: id.to_string(),
            api_key: api_key.to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
            model: model.to_string(),
            temperature: None,
            client: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    /// Create a Groq provider
    pub fn groq(api_key: &str, model: &str, timeout: Duration) -> Self {
        Self::new("groq", api_key, model, timeout).with_base_url(GROQ_BASE_URL)
    }

    /// Create with a specific base URL
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
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
        });
        if let Some(temperature) = self.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }
        body
    }

    fn post(&self, body: &serde_json::Value) -> Result<serde_json::Value, LlmError> {
        let response = self
            .client
            .post(&format!("{}/chat/completions", self.base_url))
            .set("Content-Type", "application/json")
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(body)?;

        Ok(response.into_json()?)
    }
}

impl ModelInvoker for OpenAiCompatible {
    fn id(&self) -> &str {
        &self.id
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let json = self.post(&self.request_body(messages))?;
        extract_content(&json)
    }

    fn complete_structured(
        &self,
        messages: &[ChatMessage],
        schema: &OutputSchema,
    ) -> Result<serde_json::Value, LlmError> {
        // Force a single call of a function whose parameters are the schema
        let mut body = self.request_body(messages);
        body["tools"] = serde_json::json!([{
            "type": "function",
            "function": {
                "name": schema.name,
                "description": schema.description,
                "parameters": schema.schema,
            }
        }]);
        body["tool_choice"] = serde_json::json!({
            "type": "function",
            "function": { "name": schema.name }
        });

        let json = self.post(&body)?;
        extract_tool_arguments(&json, &schema.name)
    }
}

/// Pull `choices[0].message.content` out of a completion response
fn extract_content(json: &serde_json::Value) -> Result<String, LlmError> {
    if let Some(error) = json.get("error") {
        return Err(api_error(error));
    }

    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| LlmError::InvalidResponse("missing choices[0].message.content".to_string()))
}

/// Pull and parse the forced tool call's arguments
fn extract_tool_arguments(
    json: &serde_json::Value,
    function_name: &str,
) -> Result<serde_json::Value, LlmError> {
    if let Some(error) = json.get("error") {
        return Err(api_error(error));
    }

    let call = json
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("tool_calls"))
        .and_then(|t| t.as_array())
        .and_then(|calls| {
            calls.iter().find(|call| {
                call.get("function")
                    .and_then(|f| f.get("name"))
                    .and_then(|n| n.as_str())
                    == Some(function_name)
            })
        })
        .ok_or_else(|| {
            LlmError::SchemaViolation(format!("no `{}` tool call in response", function_name))
        })?;

    let arguments = call
        .get("function")
        .and_then(|f| f.get("arguments"))
        .ok_or_else(|| LlmError::SchemaViolation("tool call without arguments".to_string()))?;

    // Arguments arrive as a JSON-encoded string on most providers
    match arguments {
        serde_json::Value::String(raw) => serde_json::from_str(raw)
            .map_err(|e| LlmError::SchemaViolation(format!("arguments are not JSON: {}", e))),
        serde_json::Value::Object(_) => Ok(arguments.clone()),
        other => Err(LlmError::SchemaViolation(format!(
            "unexpected arguments value: {}",
            other
        ))),
    }
}

fn api_error(error: &serde_json::Value) -> LlmError {
    let message = error
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("Unknown error");
    LlmError::Api {
        status: 500,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_content() {
        let json = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "68"}}]
        });
        assert_eq!(extract_content(&json).unwrap(), "68");
    }

    #[test]
    fn test_extract_content_surfaces_api_error() {
        let json = serde_json::json!({"error": {"message": "model decommissioned"}});
        let err = extract_content(&json).unwrap_err();
        assert!(matches!(err, LlmError::Api { .. }));
    }

    #[test]
    fn test_extract_tool_arguments_from_string() {
        let json = serde_json::json!({
            "choices": [{"message": {"tool_calls": [{
                "type": "function",
                "function": {
                    "name": "RoutingDecision",
                    "arguments": "{\"next\": \"coder\", \"reason\": \"arithmetic\"}"
                }
            }]}}]
        });
        let args = extract_tool_arguments(&json, "RoutingDecision").unwrap();
        assert_eq!(
            args,
            serde_json::json!({"next": "coder", "reason": "arithmetic"})
        );
    }

    #[test]
    fn test_missing_tool_call_is_schema_violation() {
        let json = serde_json::json!({
            "choices": [{"message": {"content": "I think the coder should do it"}}]
        });
        let err = extract_tool_arguments(&json, "RoutingDecision").unwrap_err();
        assert!(matches!(err, LlmError::SchemaViolation(_)));
    }

    #[test]
    fn test_request_body_includes_temperature_when_set() {
        let provider = OpenAiCompatible::groq("key", "mixtral-8x7b-32768", Duration::from_secs(5))
            .with_temperature(Some(0.2));
        let body = provider.request_body(&[ChatMessage::user("Hello").named("user")]);
        assert_eq!(body["model"], "mixtral-8x7b-32768");
        assert_eq!(body["messages"][0]["name"], "user");
        assert!(body.get("temperature").is_some());
        assert_eq!(provider.base_url, GROQ_BASE_URL);
    }
}
