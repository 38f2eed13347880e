use super::AppState;
use crate::completion::CompletionError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use folio_core::{build_messages, build_research_context, ChatRequest, ChatResponse, ErrorBody};
use thiserror::Error;

/// Failures of `POST /api/chat`, each with a fixed status and error key.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("completion provider credential is not configured")]
    MissingCredential,

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error("question is blank")]
    BlankQuestion,

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("context assembly failed: {0}")]
    Internal(String),
}

impl ChatError {
    pub fn status(&self) -> StatusCode {
        match self {
            ChatError::InvalidBody(_) | ChatError::BlankQuestion => StatusCode::BAD_REQUEST,
            ChatError::Completion(CompletionError::Authentication(_)) => StatusCode::UNAUTHORIZED,
            ChatError::MissingCredential
            | ChatError::Completion(CompletionError::Generation(_))
            | ChatError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            ChatError::MissingCredential => ErrorBody::new("OpenAI API key not configured"),
            ChatError::InvalidBody(detail) => {
                ErrorBody::new("Invalid request body").with_message(detail.clone())
            }
            ChatError::BlankQuestion => ErrorBody::new("Question is required"),
            ChatError::Completion(CompletionError::Authentication(_)) => {
                ErrorBody::new("Invalid API Key")
                    .with_message("Please check your OpenAI API key configuration")
            }
            ChatError::Completion(CompletionError::Generation(detail)) => {
                ErrorBody::new("Failed to generate response").with_message(detail.clone())
            }
            ChatError::Internal(detail) => {
                ErrorBody::new("Failed to generate response").with_message(detail.clone())
            }
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Chat request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Chat request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}

/// POST /api/chat: answer a question about the site's content.
///
/// Checks run in order: credential, body, question. Content is reloaded on
/// every call.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ChatError> {
    let provider = state.completion.clone().ok_or(ChatError::MissingCredential)?;

    let Json(request) = payload.map_err(|e| ChatError::InvalidBody(e.body_text()))?;
    if !request.has_question() {
        return Err(ChatError::BlankQuestion);
    }

    let sources = state.loader.sources().clone();
    let context = tokio::task::spawn_blocking(move || build_research_context(&sources))
        .await
        .map_err(|e| ChatError::Internal(e.to_string()))?;

    let messages = build_messages(&context, &request.messages, &request.question);
    tracing::debug!(
        history = request.messages.len(),
        context_chars = context.chars().count(),
        "Sending chat completion"
    );

    let response = provider.complete(&messages).await?;

    Ok(Json(ChatResponse {
        response,
        model: provider.model().to_string(),
        timestamp: Utc::now(),
    }))
}
