use super::{chat, AppResult, AppState, JsonResponse};
use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use folio_core::{build_research_context, Document, SourceCategory};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat::chat))
        .route("/api/documents", get(list_documents))
        .route("/api/context", get(research_context))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    healthy: bool,
    version: String,
    uptime_seconds: u64,
    credential_configured: bool,
}

async fn health(State(state): State<AppState>) -> Json<JsonResponse<HealthResponse>> {
    Json(JsonResponse::ok(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        credential_configured: state.completion.is_some(),
    }))
}

#[derive(Deserialize)]
struct ListDocumentsQuery {
    category: Option<SourceCategory>,
}

/// GET /api/documents?category=project: the aggregated documents
async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ListDocumentsQuery>,
) -> Json<JsonResponse<Vec<Document>>> {
    let mut documents = state.loader.aggregate().await;
    if let Some(category) = query.category {
        documents.retain(|d| d.category == category);
    }
    Json(JsonResponse::ok(documents))
}

#[derive(Serialize)]
struct ContextData {
    context: String,
    length: usize,
}

/// GET /api/context: the assembled research context
async fn research_context(State(state): State<AppState>) -> AppResult<Json<JsonResponse<ContextData>>> {
    let sources = state.loader.sources().clone();
    let context = tokio::task::spawn_blocking(move || build_research_context(&sources)).await?;
    Ok(Json(JsonResponse::ok(ContextData {
        length: context.chars().count(),
        context,
    })))
}
