//! Workflow types
//!
//! Conversation state shared by the role nodes and the engine.

use crate::llm::{ChatMessage, LlmError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who wrote a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Supervisor,
    Researcher,
    Coder,
}

impl Author {
    pub fn as_str(&self) -> &'static str {
        match self {
            Author::User => "user",
            Author::Supervisor => "supervisor",
            Author::Researcher => "researcher",
            Author::Coder => "coder",
        }
    }

    /// Whether this author is a worker whose output can answer the query
    pub fn is_worker(&self) -> bool {
        matches!(self, Author::Researcher | Author::Coder)
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    author: Author,
    content: String,
}

impl Message {
    pub fn new(author: Author, content: impl Into<String>) -> Self {
        Self {
            author,
            content: content.into(),
        }
    }

    pub fn author(&self) -> Author {
        self.author
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Provider-facing form; every participant speaks as a named user turn
    pub fn to_chat_message(&self) -> ChatMessage {
        ChatMessage::user(self.content.clone()).named(self.author.as_str())
    }
}

/// Append-only conversation history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// Start a log with the user's query
    pub fn seeded(query: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::new(Author::User, query)],
        }
    }

    /// Return a log with `message` appended
    pub fn append(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Prepend a system instruction and convert for the model invoker
    pub fn to_prompt(&self, system: &str) -> Vec<ChatMessage> {
        let mut prompt = Vec::with_capacity(self.messages.len() + 1);
        prompt.push(ChatMessage::system(system));
        prompt.extend(self.messages.iter().map(Message::to_chat_message));
        prompt
    }
}

/// Destination chosen by the supervisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    #[serde(rename = "researcher")]
    Researcher,
    #[serde(rename = "coder")]
    Coder,
    #[serde(rename = "FINISH")]
    Finish,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Researcher, Route::Coder, Route::Finish];

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Researcher => "researcher",
            Route::Coder => "coder",
            Route::Finish => "FINISH",
        }
    }
}

impl std::str::FromStr for Route {
    type Err = LlmError;

    /// Exact match only; anything else is a schema violation
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::ALL
            .into_iter()
            .find(|route| route.as_str() == s)
            .ok_or_else(|| {
                LlmError::SchemaViolation(format!(
                    "`next` must be one of researcher, coder, FINISH; got {:?}",
                    s
                ))
            })
    }
}

/// Routing signal carried in the workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Next {
    /// Initial value; nothing has been routed yet
    Supervisor,
    /// Set by a node
    #[serde(untagged)]
    Route(Route),
}

impl From<Route> for Next {
    fn from(route: Route) -> Self {
        Next::Route(route)
    }
}

/// Snapshot of a run between node executions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowState {
    pub messages: MessageLog,
    pub next: Next,
}

impl WorkflowState {
    /// Initial state for a query
    pub fn initial(query: impl Into<String>) -> Self {
        Self {
            messages: MessageLog::seeded(query),
            next: Next::Supervisor,
        }
    }

    /// Successor state: one more message and a new routing signal
    pub fn advance(self, message: Message, next: impl Into<Next>) -> Self {
        Self {
            messages: self.messages.append(message),
            next: next.into(),
        }
    }
}
