//! Role nodes
//!
//! The supervisor picks a destination through a schema-constrained call;
//! the researcher and coder each answer with one free-text call and always
//! hand control back to the terminal state.

use super::types::{Author, Message, Route, WorkflowState};
use crate::llm::{LlmError, ModelInvoker, OutputSchema};
use crate::Result;
use serde::{Deserialize, Serialize};

const SUPERVISOR_PROMPT: &str = r#"
You are a supervisor routing tasks to either:
- Researcher: For gathering info or web searches
- Coder: For coding or calculations
- FINISH: If the query is already answerable
Analyze the latest message and decide.
"#;

const RESEARCHER_PROMPT: &str = "You are a researcher. Use search tools or knowledge to answer.";

const CODER_PROMPT: &str = "You are a coder. Solve technical or calculation-based queries.";

/// System instructions for each role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub supervisor: String,
    pub researcher: String,
    pub coder: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            supervisor: SUPERVISOR_PROMPT.trim().to_string(),
            researcher: RESEARCHER_PROMPT.to_string(),
            coder: CODER_PROMPT.to_string(),
        }
    }
}

/// A step of the workflow graph bound to one role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    Supervisor,
    Researcher,
    Coder,
}

impl Node {
    /// Step name as it appears in transcripts
    pub fn name(&self) -> &'static str {
        self.author().as_str()
    }

    /// Author tag of the message this node appends
    pub fn author(&self) -> Author {
        match self {
            Node::Supervisor => Author::Supervisor,
            Node::Researcher => Author::Researcher,
            Node::Coder => Author::Coder,
        }
    }

    /// Execute the node against `state`, returning the successor state
    pub fn run(
        &self,
        state: WorkflowState,
        invoker: &dyn ModelInvoker,
        prompts: &Prompts,
    ) -> Result<WorkflowState> {
        match self {
            Node::Supervisor => supervisor_node(state, invoker, &prompts.supervisor),
            Node::Researcher => worker_node(*self, state, invoker, &prompts.researcher),
            Node::Coder => worker_node(*self, state, invoker, &prompts.coder),
        }
    }
}

/// Decision returned by the supervisor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingDecision {
    pub next: Route,
    pub reason: String,
}

impl RoutingDecision {
    pub const SCHEMA_NAME: &'static str = "RoutingDecision";

    /// Schema handed to the invoker in structured mode
    pub fn schema() -> OutputSchema {
        OutputSchema {
            name: Self::SCHEMA_NAME.to_string(),
            description: "Choose the next worker for the conversation, or FINISH".to_string(),
            schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "next": {
                        "type": "string",
                        "enum": Route::ALL.iter().map(Route::as_str).collect::<Vec<_>>()
                    },
                    "reason": { "type": "string" }
                },
                "required": ["next", "reason"]
            }),
        }
    }

    /// Validate a structured-output value
    pub fn from_value(value: &serde_json::Value) -> std::result::Result<Self, LlmError> {
        let next = value
            .get("next")
            .and_then(|v| v.as_str())
            .ok_or_else(|| LlmError::SchemaViolation("missing string field `next`".to_string()))?
            .parse::<Route>()?;

        let reason = value
            .get("reason")
            .and_then(|v| v.as_str())
            .ok_or_else(|| LlmError::SchemaViolation("missing string field `reason`".to_string()))?
            .to_string();

        Ok(Self { next, reason })
    }
}

fn supervisor_node(
    state: WorkflowState,
    invoker: &dyn ModelInvoker,
    system: &str,
) -> Result<WorkflowState> {
    let prompt = state.messages.to_prompt(system);
    let value = invoker.complete_structured(&prompt, &RoutingDecision::schema())?;
    let decision = RoutingDecision::from_value(&value)?;

    tracing::info!(next = decision.next.as_str(), reason = %decision.reason, "supervisor routed");

    let message = Message::new(Author::Supervisor, decision.reason);
    Ok(state.advance(message, decision.next))
}

fn worker_node(
    node: Node,
    state: WorkflowState,
    invoker: &dyn ModelInvoker,
    system: &str,
) -> Result<WorkflowState> {
    let prompt = state.messages.to_prompt(system);
    let content = invoker.complete(&prompt)?;

    tracing::debug!(node = node.name(), chars = content.len(), "worker answered");

    let message = Message::new(node.author(), content);
    Ok(state.advance(message, Route::Finish))
}
