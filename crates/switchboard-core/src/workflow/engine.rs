//! Workflow engine
//!
//! Drives one query through the supervisor and at most one worker:
//!
//! ```text
//! SUPERVISOR ──researcher──► RESEARCHER ──► TERMINATED
//!     │      ──coder───────► CODER ──────► TERMINATED
//!     └──────FINISH────────────────────────► TERMINATED
//! ```

use super::nodes::{Node, Prompts};
use super::transcript::{ChatResult, Transcript};
use super::types::{Next, Route, WorkflowState};
use crate::llm::SharedInvoker;
use crate::{Result, SwitchboardError};
use uuid::Uuid;

/// Position of a run in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Supervisor,
    Researcher,
    Coder,
    Terminated,
}

impl Stage {
    /// Node executed in this stage, `None` once terminated
    pub fn node(&self) -> Option<Node> {
        match self {
            Stage::Supervisor => Some(Node::Supervisor),
            Stage::Researcher => Some(Node::Researcher),
            Stage::Coder => Some(Node::Coder),
            Stage::Terminated => None,
        }
    }

    /// Stage that follows once this stage's node has produced `next`
    pub fn transition(&self, next: Next) -> Result<Stage> {
        match self {
            Stage::Supervisor => match next {
                Next::Route(Route::Researcher) => Ok(Stage::Researcher),
                Next::Route(Route::Coder) => Ok(Stage::Coder),
                Next::Route(Route::Finish) => Ok(Stage::Terminated),
                Next::Supervisor => Err(SwitchboardError::invalid_transition(
                    "supervisor cannot route back to itself",
                )),
            },
            Stage::Researcher | Stage::Coder => Ok(Stage::Terminated),
            Stage::Terminated => Err(SwitchboardError::invalid_transition(
                "run already terminated",
            )),
        }
    }
}

/// Supervisor/worker workflow bound to one model invoker
///
/// Holds only read-only configuration, so one instance can serve any number
/// of concurrent runs; each run owns its own state and transcript.
#[derive(Clone)]
pub struct Workflow {
    invoker: SharedInvoker,
    prompts: Prompts,
}

impl Workflow {
    /// Create a workflow with the default role instructions
    pub fn new(invoker: SharedInvoker) -> Self {
        Self::with_prompts(invoker, Prompts::default())
    }

    /// Create a workflow with custom role instructions
    pub fn with_prompts(invoker: SharedInvoker, prompts: Prompts) -> Self {
        Self { invoker, prompts }
    }

    pub fn invoker(&self) -> &SharedInvoker {
        &self.invoker
    }

    pub fn prompts(&self) -> &Prompts {
        &self.prompts
    }

    /// Run a query to completion.
    ///
    /// Blocks on every model call. Any invoker failure aborts the run and no
    /// partial result is produced.
    pub fn run(&self, query: &str) -> Result<ChatResult> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("workflow_run", %run_id, provider = self.invoker.id());
        let _guard = span.enter();

        tracing::info!(query_chars = query.len(), "run started");

        let mut state = WorkflowState::initial(query);
        let mut transcript = Transcript::new();
        let mut stage = Stage::Supervisor;

        while let Some(node) = stage.node() {
            let before = state.messages.len();
            state = node
                .run(state, self.invoker.as_ref(), &self.prompts)
                .inspect_err(|e| tracing::error!(node = node.name(), error = %e, "node failed"))?;
            debug_assert_eq!(state.messages.len(), before + 1);

            let message = state.messages.last().ok_or_else(|| {
                SwitchboardError::invalid_transition("node produced no message")
            })?;
            transcript.record(node, message);

            stage = stage.transition(state.next)?;
            tracing::debug!(node = node.name(), next = ?stage, "node finished");
        }

        let result = ChatResult::assemble(query, transcript);
        tracing::info!(steps = result.workflow_steps.len(), "run completed");
        Ok(result)
    }
}

impl std::fmt::Debug for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("provider", &self.invoker.id())
            .field("model", &self.invoker.model())
            .finish()
    }
}
