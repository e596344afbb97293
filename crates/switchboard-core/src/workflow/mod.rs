//! Supervisor/worker workflow
//!
//! Routes one user query through a small graph of role nodes:
//! - Supervisor: decides who should handle the query
//! - Researcher: gathers information
//! - Coder: solves technical or calculation queries
//!
//! # Example
//!
//! ```no_run
//! use switchboard_core::llm::OllamaProvider;
//! use switchboard_core::workflow::Workflow;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let invoker = Arc::new(OllamaProvider::new("http://localhost:11434", "llama3", Duration::from_secs(60)));
//! let workflow = Workflow::new(invoker);
//!
//! let result = workflow.run("What is 17 * 4?").unwrap();
//! println!("{}", result.final_answer);
//! ```

mod engine;
mod nodes;
mod transcript;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{Stage, Workflow};
pub use nodes::{Node, Prompts, RoutingDecision};
pub use transcript::{ChatResult, RunStatus, StepRecord, Transcript, NO_ANSWER};
pub use types::{Author, Message, MessageLog, Next, Route, WorkflowState};
