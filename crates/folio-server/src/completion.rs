//! Chat-completion client for OpenAI-compatible endpoints.
//!
//! One attempt per call: no retries, no backoff. Failures are classified as
//! authentication failures (HTTP 401 or an "unauthorized" indicator in the
//! error text) or generic generation failures.

use async_trait::async_trait;
use folio_core::ChatMessage;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Returned when the provider answers without any choice text.
pub const FALLBACK_RESPONSE: &str = "Sorry, I couldn't generate a response.";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompletionError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Generation failed: {0}")]
    Generation(String),
}

impl CompletionError {
    /// Classify a provider failure by status code and message text.
    pub fn classify(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        let message = message.into();
        if status == Some(StatusCode::UNAUTHORIZED) || looks_unauthorized(&message) {
            CompletionError::Authentication(message)
        } else {
            CompletionError::Generation(message)
        }
    }
}

fn looks_unauthorized(message: &str) -> bool {
    message
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token == "401" || token.eq_ignore_ascii_case("unauthorized"))
}

/// A black-box completion endpoint.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Model identifier reported back to chat clients.
    fn model(&self) -> &str;

    /// Generate the assistant reply for `messages`.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError>;
}

/// Fixed sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Talks to `<base_url>/chat/completions` with a bearer credential.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    settings: CompletionSettings,
}

impl OpenAiClient {
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        settings: CompletionSettings,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        tracing::info!(
            model = %settings.model,
            base_url = %base_url,
            "Creating completion client"
        );

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            settings,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    fn model(&self) -> &str {
        &self.settings.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        let body = CompletionRequest {
            model: &self.settings.model,
            messages,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::classify(e.status(), format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(CompletionError::classify(Some(status), provider_message(status, &text)));
        }

        let parsed: CompletionResponse = response.json().await.map_err(|e| {
            CompletionError::Generation(format!("failed to parse completion response: {}", e))
        })?;

        Ok(first_choice_text(parsed))
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

fn first_choice_text(response: CompletionResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| FALLBACK_RESPONSE.to_string())
}

/// `401 Unauthorized: Incorrect API key provided`
fn provider_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    if detail.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode as AxumStatus, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct FakeProvider {
        status: AxumStatus,
        reply: Value,
        seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    }

    async fn fake_completions(
        State(fake): State<FakeProvider>,
        headers: axum::http::HeaderMap,
        Json(body): Json<Value>,
    ) -> (AxumStatus, Json<Value>) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        fake.seen.lock().unwrap().push((auth, body));
        (fake.status, Json(fake.reply.clone()))
    }

    async fn spawn_fake(
        status: AxumStatus,
        reply: Value,
    ) -> (String, Arc<Mutex<Vec<(Option<String>, Value)>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let fake = FakeProvider {
            status,
            reply,
            seen: seen.clone(),
        };
        let app = Router::new()
            .route("/v1/chat/completions", post(fake_completions))
            .with_state(fake);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/v1", addr), seen)
    }

    fn settings() -> CompletionSettings {
        CompletionSettings {
            model: "test-model".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }

    fn client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new(base_url, "sk-test", settings(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_classify() {
        assert!(matches!(
            CompletionError::classify(Some(StatusCode::UNAUTHORIZED), "nope"),
            CompletionError::Authentication(_)
        ));
        assert!(matches!(
            CompletionError::classify(None, "Unauthorized"),
            CompletionError::Authentication(_)
        ));
        assert!(matches!(
            CompletionError::classify(None, "Request failed with status code 401"),
            CompletionError::Authentication(_)
        ));
        assert!(matches!(
            CompletionError::classify(Some(StatusCode::TOO_MANY_REQUESTS), "slow down"),
            CompletionError::Generation(_)
        ));
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let c = client("https://api.example.com/v1/");
        assert_eq!(c.endpoint(), "https://api.example.com/v1/chat/completions");
        assert_eq!(c.model(), "test-model");
    }

    #[tokio::test]
    async fn test_complete_sends_settings_and_returns_first_choice() {
        let (base, seen) = spawn_fake(
            AxumStatus::OK,
            json!({"choices": [
                {"message": {"role": "assistant", "content": "first"}},
                {"message": {"role": "assistant", "content": "second"}}
            ]}),
        )
        .await;

        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let answer = client(&base).complete(&messages).await.unwrap();
        assert_eq!(answer, "first");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (auth, body) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["max_tokens"], 1000);
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(
            body["messages"],
            json!([{"role": "system", "content": "sys"}, {"role": "user", "content": "hi"}])
        );
    }

    #[tokio::test]
    async fn test_empty_choices_fall_back() {
        let (base, _) = spawn_fake(AxumStatus::OK, json!({"choices": []})).await;
        let answer = client(&base).complete(&[ChatMessage::user("hi")]).await.unwrap();
        assert_eq!(answer, FALLBACK_RESPONSE);

        let (base, _) =
            spawn_fake(AxumStatus::OK, json!({"choices": [{"message": {"content": null}}]})).await;
        let answer = client(&base).complete(&[ChatMessage::user("hi")]).await.unwrap();
        assert_eq!(answer, FALLBACK_RESPONSE);
    }

    #[tokio::test]
    async fn test_unauthorized_is_authentication_error() {
        let (base, _) = spawn_fake(
            AxumStatus::UNAUTHORIZED,
            json!({"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}),
        )
        .await;
        let err = client(&base).complete(&[ChatMessage::user("hi")]).await.unwrap_err();
        match err {
            CompletionError::Authentication(message) => {
                assert!(message.contains("Incorrect API key provided"))
            }
            other => panic!("expected authentication error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_generation_error() {
        let (base, seen) = spawn_fake(
            AxumStatus::INTERNAL_SERVER_ERROR,
            json!({"error": {"message": "The server had an error"}}),
        )
        .await;
        let err = client(&base).complete(&[ChatMessage::user("hi")]).await.unwrap_err();
        assert_eq!(
            err,
            CompletionError::Generation(
                "500 Internal Server Error: The server had an error".to_string()
            )
        );
        // single attempt, no retry
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_generation_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}/v1", addr))
            .complete(&[ChatMessage::user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, CompletionError::Generation(_)));
    }
}
