//! LLM integration module
//!
//! Blocking model invokers used by the workflow nodes.
//!
//! Supported providers:
//! - Groq (OpenAI-compatible API)
//! - OpenAI
//! - Ollama (local inference)

mod error;
mod message;
mod ollama;
mod openai;
mod provider;
mod registry;

pub use error::LlmError;
pub use message::{ChatMessage, OutputSchema, Role};
pub use provider::{ModelInvoker, SharedInvoker};
pub use registry::build_invoker;

// Provider implementations
pub use ollama::{OllamaProvider, OLLAMA_BASE_URL};
pub use openai::{OpenAiCompatible, GROQ_BASE_URL, OPENAI_BASE_URL};
