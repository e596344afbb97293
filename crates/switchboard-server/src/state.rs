//! Server state management

use switchboard_core::Workflow;
use std::sync::Arc;

/// Shared application state
///
/// The workflow is immutable once built; every request runs against the
/// same instance with its own per-run state.
#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<Workflow>,
}

impl AppState {
    pub fn new(workflow: Workflow) -> Self {
        Self {
            workflow: Arc::new(workflow),
        }
    }
}
