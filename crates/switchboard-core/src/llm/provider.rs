//! Model invoker trait

use super::{ChatMessage, LlmError, OutputSchema};
use std::sync::Arc;

/// Model invoker trait
///
/// Defines the blocking interface the workflow uses to talk to a language
/// model. Implementations must be safe to share between concurrent runs;
/// nothing in the trait mutates the invoker.
pub trait ModelInvoker: Send + Sync {
    /// Get the provider's unique identifier (e.g., "groq", "ollama")
    fn id(&self) -> &str;

    /// Get the model name used for every call
    fn model(&self) -> &str;

    /// Free-text mode: return the assistant's text reply.
    fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;

    /// Structured mode: return a JSON object produced under `schema`.
    ///
    /// Implementations only guarantee a JSON object came back; callers
    /// validate it against their own record type.
    fn complete_structured(
        &self,
        messages: &[ChatMessage],
        schema: &OutputSchema,
    ) -> Result<serde_json::Value, LlmError>;
}

/// Thread-safe invoker reference
pub type SharedInvoker = Arc<dyn ModelInvoker>;
