//! Client-side chat session.
//!
//! A session is `Idle` or `AwaitingResponse`. Submitting a question moves it
//! to `AwaitingResponse`; resolving or failing moves it back. The transcript
//! only grows, and every finished turn ends with an assistant message.

use crate::chat::{ChatMessage, ChatRequest, Role};
use crate::error::{FolioError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One turn in the transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationMessage {
    /// UUIDv7, so ids sort by creation time.
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ConversationMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn to_chat_message(&self) -> ChatMessage {
        ChatMessage::new(self.role, self.content.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    Idle,
    AwaitingResponse,
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ConversationMessage>,
    state: SessionState,
    last_error: Option<String>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            state: SessionState::Idle,
            last_error: None,
        }
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.state == SessionState::AwaitingResponse
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Accept a new question and return the request to send.
    ///
    /// Rejected without touching the session when a request is already in
    /// flight or the question is blank. The request carries the transcript as
    /// it was before this question.
    pub fn submit(&mut self, question: &str) -> Result<ChatRequest> {
        if self.is_awaiting_response() {
            return Err(FolioError::SessionBusy);
        }
        if question.trim().is_empty() {
            return Err(FolioError::Validation("question is blank".to_string()));
        }

        let request = ChatRequest {
            messages: self.history(),
            question: question.to_string(),
        };

        self.messages.push(ConversationMessage::new(Role::User, question));
        self.last_error = None;
        self.state = SessionState::AwaitingResponse;
        Ok(request)
    }

    /// Record the assistant's answer for the in-flight request.
    pub fn resolve(&mut self, answer: impl Into<String>) -> Result<()> {
        if !self.is_awaiting_response() {
            return Err(FolioError::NotAwaiting);
        }
        self.messages
            .push(ConversationMessage::new(Role::Assistant, answer));
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Record a failed round trip. The transcript still gets an assistant
    /// message describing the failure.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<()> {
        if !self.is_awaiting_response() {
            return Err(FolioError::NotAwaiting);
        }
        let error = error.into();
        self.messages.push(ConversationMessage::new(
            Role::Assistant,
            describe_failure(&error),
        ));
        self.last_error = Some(error);
        self.state = SessionState::Idle;
        Ok(())
    }

    /// The transcript as wire messages.
    pub fn history(&self) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .map(ConversationMessage::to_chat_message)
            .collect()
    }
}

/// Assistant-facing wording for a failed round trip.
pub fn describe_failure(error: &str) -> String {
    format!(
        "Sorry, I encountered an error: {}. Please try again later.",
        error.trim_end_matches('.')
    )
}
