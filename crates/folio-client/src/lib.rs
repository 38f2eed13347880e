//! Rust client for the Folio research chat API.
//!
//! Thin wrapper over `reqwest` that speaks the `POST /api/chat` contract and
//! drives a [`ChatSession`] through its submit / resolve / fail transitions.
//!
//! # Example
//! ```rust,no_run
//! use folio_client::FolioClient;
//! use folio_core::ChatSession;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), folio_client::ClientError> {
//!     let client = FolioClient::new("http://localhost:3000");
//!     let mut session = ChatSession::new();
//!
//!     let reply = client.send(&mut session, "What are you working on?").await?;
//!     println!("{} ({})", reply.response, reply.model);
//!     Ok(())
//! }
//! ```
use folio_core::{ChatRequest, ChatResponse, ChatSession, ErrorBody, FolioError};
use reqwest::Client;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with an error status and `{error, message?}` body.
    #[error("{body}")]
    Server { status: u16, body: ErrorBody },

    #[error(transparent)]
    Session(#[from] FolioError),
}

impl ClientError {
    /// HTTP status of a server-side failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            ClientError::Session(_) => None,
        }
    }
}

/// A client bound to one Folio server.
#[derive(Clone)]
pub struct FolioClient {
    http: Client,
    base_url: String,
}

impl FolioClient {
    /// `base_url` is the server root, e.g. `"http://localhost:3000"`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One round trip to `POST /api/chat`.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let url = format!("{}/api/chat", self.base_url);
        let resp = self.http.post(&url).json(request).send().await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json().await?);
        }

        let text = resp.text().await.unwrap_or_default();
        let body = serde_json::from_str::<ErrorBody>(&text).unwrap_or_else(|_| {
            let body = ErrorBody::new(format!("HTTP {}", status.as_u16()));
            if text.trim().is_empty() {
                body
            } else {
                body.with_message(text.trim())
            }
        });
        Err(ClientError::Server {
            status: status.as_u16(),
            body,
        })
    }

    /// Ask `question` within `session`.
    ///
    /// The session rejects blank questions and overlapping submissions before
    /// any request is made. On a failed round trip the session records an
    /// assistant message describing the error and the error is returned.
    pub async fn send(
        &self,
        session: &mut ChatSession,
        question: &str,
    ) -> Result<ChatResponse, ClientError> {
        let request = session.submit(question)?;

        match self.chat(&request).await {
            Ok(reply) => {
                session.resolve(reply.response.clone())?;
                Ok(reply)
            }
            Err(e) => {
                session.fail(e.to_string())?;
                Err(e)
            }
        }
    }
}
