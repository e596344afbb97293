//! Provider-facing chat message types

use serde::{Deserialize, Serialize};

/// Role in the conversation, as providers understand it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Chat message sent to a model provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: Role,

    /// Optional participant name (e.g. "supervisor")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Text content
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            name: None,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            name: None,
            content: content.into(),
        }
    }

    /// Attach a participant name to the message
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Convert to the `{"role", "name"?, "content"}` object most chat APIs accept
    pub fn to_api_json(&self) -> serde_json::Value {
        let mut value = serde_json::json!({
            "role": self.role.as_str(),
            "content": self.content,
        });
        if let Some(name) = &self.name {
            value["name"] = serde_json::Value::String(name.clone());
        }
        value
    }
}

/// Schema constraint for structured-output invocations
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    /// Function/schema name presented to the provider
    pub name: String,

    /// Short description of what the output represents
    pub description: String,

    /// JSON Schema of the expected object
    pub schema: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_json_includes_name_only_when_set() {
        let plain = ChatMessage::user("hi").to_api_json();
        assert_eq!(plain, serde_json::json!({"role": "user", "content": "hi"}));

        let named = ChatMessage::user("route it").named("supervisor").to_api_json();
        assert_eq!(named["name"], "supervisor");
        assert_eq!(named["role"], "user");
    }
}
