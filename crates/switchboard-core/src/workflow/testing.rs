//! Scripted model invoker for workflow tests

use crate::llm::{ChatMessage, LlmError, ModelInvoker, OutputSchema};
use parking_lot::Mutex;

/// Returns canned replies and remembers every prompt it was given
pub(crate) struct ScriptedInvoker {
    structured: Result<serde_json::Value, LlmError>,
    text: Result<String, LlmError>,
    structured_calls: Mutex<Vec<Vec<ChatMessage>>>,
    text_calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedInvoker {
    /// Supervisor answers with `{"next": next, "reason": reason}`
    pub fn routing(next: &str, reason: &str) -> Self {
        Self {
            structured: Ok(serde_json::json!({ "next": next, "reason": reason })),
            text: Err(LlmError::InvalidResponse("no scripted text".to_string())),
            structured_calls: Mutex::new(Vec::new()),
            text_calls: Mutex::new(Vec::new()),
        }
    }

    /// Structured calls fail with `err`
    pub fn failing_structured(err: LlmError) -> Self {
        Self {
            structured: Err(err),
            ..Self::routing("FINISH", "")
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Ok(text.to_string());
        self
    }

    pub fn with_text_error(mut self, err: LlmError) -> Self {
        self.text = Err(err);
        self
    }

    pub fn structured_prompts(&self) -> Vec<Vec<ChatMessage>> {
        self.structured_calls.lock().clone()
    }

    pub fn text_prompts(&self) -> Vec<Vec<ChatMessage>> {
        self.text_calls.lock().clone()
    }
}

impl ModelInvoker for ScriptedInvoker {
    fn id(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.text_calls.lock().push(messages.to_vec());
        self.text.clone()
    }

    fn complete_structured(
        &self,
        messages: &[ChatMessage],
        _schema: &OutputSchema,
    ) -> Result<serde_json::Value, LlmError> {
        self.structured_calls.lock().push(messages.to_vec());
        self.structured.clone()
    }
}
