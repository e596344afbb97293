//! Transcript of a workflow run and the result returned to callers

use super::nodes::Node;
use super::types::{Author, Message};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final answer when no worker produced output
pub const NO_ANSWER: &str = "No answer generated";

/// Record of one node execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Node that ran
    pub step: Node,
    /// Author of the message the node produced
    pub role: Author,
    pub content: String,
    /// When the record was created (ISO-8601 on the wire)
    pub timestamp: DateTime<Utc>,
}

/// Ordered step records for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    steps: Vec<StepRecord>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the message a node just produced
    pub fn record(&mut self, step: Node, message: &Message) {
        self.steps.push(StepRecord {
            step,
            role: message.author(),
            content: message.content().to_string(),
            timestamp: Utc::now(),
        });
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Content of the latest worker record, scanning from the end
    pub fn final_answer(&self) -> &str {
        self.steps
            .iter()
            .rev()
            .find(|record| record.role.is_worker())
            .map(|record| record.content.as_str())
            .unwrap_or(NO_ANSWER)
    }

    pub fn into_steps(self) -> Vec<StepRecord> {
        self.steps
    }
}

/// Outcome reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResult {
    pub status: RunStatus,
    pub original_query: String,
    pub workflow_steps: Vec<StepRecord>,
    pub final_answer: String,
    pub completed_at: DateTime<Utc>,
}

impl ChatResult {
    /// Assemble the result once the run has terminated
    pub fn assemble(original_query: impl Into<String>, transcript: Transcript) -> Self {
        let final_answer = transcript.final_answer().to_string();
        Self {
            status: RunStatus::Completed,
            original_query: original_query.into(),
            workflow_steps: transcript.into_steps(),
            final_answer,
            completed_at: Utc::now(),
        }
    }
}
