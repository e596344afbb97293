//! Switchboard Core - Backend library for Switchboard
//!
//! This crate provides the transport-agnostic backend functionality:
//! - Supervisor/researcher/coder workflow
//! - LLM providers (Groq, OpenAI, Ollama)
//! - Configuration loading
//!
//! Any boundary (HTTP server, CLI) drives the crate through `Workflow::run`.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────┐   query       ┌──────────────────┐   messages   ┌───────────────┐
//! │   Any boundary    │ ─────────────→│     Workflow     │ ────────────→│ ModelInvoker  │
//! │  (HTTP, CLI)      │               │  (state machine) │              │ (Groq/Ollama) │
//! │                   │ ←─────────────│                  │ ←────────────│               │
//! └───────────────────┘  ChatResult   └──────────────────┘  text/JSON   └───────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use switchboard_core::{build_invoker, load_config, Workflow};
//!
//! let config = load_config(&std::env::current_dir()?)?;
//! let workflow = Workflow::with_prompts(build_invoker(&config)?, config.prompts.clone());
//!
//! let result = workflow.run("What is 17 * 4?")?;
//! for step in &result.workflow_steps {
//!     println!("[{}] {}", step.role, step.content);
//! }
//! ```

// Public API modules
pub mod config;
pub mod error;
pub mod llm;
pub mod workflow;

// Re-export commonly used types
pub use error::{Result, SwitchboardError};

pub use config::{load_config, sample_config, ConfigError, SwitchboardConfig};

pub use llm::{build_invoker, ChatMessage, LlmError, ModelInvoker, SharedInvoker};

pub use workflow::{
    Author, ChatResult, Node, Prompts, Route, RoutingDecision, RunStatus, StepRecord, Workflow,
    NO_ANSWER,
};

/// Get the crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
