//! HTTP Endpoints
//!
//! REST API for the support assistant.

use axum::{
    extract::{Json, State},
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use query_router_core::Metadata;
use query_router_rag::{DebugHit, PartitionCounts, StoreOutcome};

use crate::state::AppState;
use crate::ServerError;

/// Questions about the size of the knowledge base, answered from the store
const COUNT_QUESTIONS: &[&str] = &[
    "how many articles are loaded",
    "how many documents in the database",
    "how many entries are in the knowledge base",
    "how many issues are loaded",
];

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors_layer = build_cors_layer(&server.cors_origins, server.cors_enabled);
    let timeout = Duration::from_secs(server.request_timeout_seconds);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/count", get(count_documents))
        .route("/rag_chat", post(rag_chat))
        .route("/chat", post(rag_chat))
        .route("/create-embedding", post(create_embedding))
        .route("/debug-search", post(debug_search))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors_layer)
        .with_state(state)
}

fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins");
        return CorsLayer::permissive();
    }

    if origins.is_empty() {
        tracing::info!("No CORS origins configured, allowing any origin");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::error!("All configured CORS origins are invalid, allowing any origin");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

fn is_count_question(query: &str) -> bool {
    let folded = query.trim().to_lowercase();
    COUNT_QUESTIONS.contains(&folded.as_str())
}

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Tijarah360 AI Assistant is ready!" }))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: String,
    partitions: PartitionCounts,
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let partitions = state.ingestor.total_counts().await;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
        partitions,
    })
}

#[derive(Serialize)]
struct CountResponse {
    count: u64,
    english: u64,
    arabic: u64,
    total: u64,
}

async fn count_documents(State(state): State<AppState>) -> impl IntoResponse {
    let counts = state.ingestor.total_counts().await;
    let count = state.ingestor.count(state.primary_language()).await;
    Json(CountResponse {
        count,
        english: counts.english,
        arabic: counts.arabic,
        total: counts.total,
    })
}

#[derive(Deserialize)]
struct ChatRequest {
    query: String,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
}

async fn rag_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(ServerError::InvalidRequest("Query is empty".to_string()));
    }

    if is_count_question(query) {
        let count = state.ingestor.count(state.primary_language()).await;
        return Ok(Json(ChatResponse {
            response: format!("There are currently {} articles loaded into the system.", count),
        }));
    }

    let routed = state.orchestrator.respond(query).await;
    tracing::info!(
        tier = routed.tier.as_str(),
        partition = routed.partition.as_deref().unwrap_or("-"),
        "Answered query"
    );

    Ok(Json(ChatResponse { response: routed.text }))
}

#[derive(Deserialize)]
struct CreateEmbeddingRequest {
    text: String,
    #[serde(default)]
    metadata: Metadata,
}

#[derive(Serialize)]
struct CreateEmbeddingResponse {
    embedding_result: StoreOutcome,
}

async fn create_embedding(
    State(state): State<AppState>,
    Json(request): Json<CreateEmbeddingRequest>,
) -> Result<Json<CreateEmbeddingResponse>, ServerError> {
    if request.text.trim().is_empty() {
        return Err(ServerError::InvalidRequest("Text is empty".to_string()));
    }

    let outcome = state.ingestor.store_one(&request.text, request.metadata).await?;
    Ok(Json(CreateEmbeddingResponse {
        embedding_result: outcome,
    }))
}

#[derive(Deserialize)]
struct DebugSearchRequest {
    query: String,
    #[serde(default)]
    k: Option<usize>,
}

#[derive(Serialize)]
struct DebugSearchResponse {
    query: String,
    total_results: usize,
    results: Vec<DebugHit>,
}

async fn debug_search(
    State(state): State<AppState>,
    Json(request): Json<DebugSearchRequest>,
) -> Result<Json<DebugSearchResponse>, ServerError> {
    if request.query.trim().is_empty() {
        return Err(ServerError::InvalidRequest("Query is empty".to_string()));
    }

    let results = state.orchestrator.debug_search(&request.query, request.k).await;
    Ok(Json(DebugSearchResponse {
        total_results: results.len(),
        query: request.query,
        results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use query_router_config::{EmbeddingProvider, Settings, TranslationProvider, VectorStoreBackend};
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_settings() -> Settings {
        let mut settings = Settings::default();
        settings.vector_store.backend = VectorStoreBackend::Memory;
        settings.vector_store.vector_dim = 64;
        settings.embedding.provider = EmbeddingProvider::Hash;
        settings.translation.provider = TranslationProvider::Disabled;
        settings.llm.api_key = None;
        settings.routing.force_target_language = false;
        settings
    }

    async fn test_state() -> AppState {
        AppState::from_settings(test_settings()).await.unwrap()
    }

    async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_router_creation() {
        let state = test_state().await;
        let _ = create_router(state);
    }

    #[test]
    fn test_count_question_matching() {
        assert!(is_count_question("How many articles are loaded"));
        assert!(is_count_question("  how many issues are loaded  "));
        assert!(!is_count_question("how many articles are loaded?"));
        assert!(!is_count_question("how do I add a product"));
    }

    #[tokio::test]
    async fn test_root_banner() {
        let state = test_state().await;
        let (status, body) = send(&state, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Tijarah360 AI Assistant is ready!");
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let state = test_state().await;
        let (status, body) = send(&state, post_json("/rag_chat", serde_json::json!({ "query": "   " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("empty"));
    }

    #[tokio::test]
    async fn test_greeting_answered_without_store() {
        let state = test_state().await;
        let (status, body) = send(&state, post_json("/chat", serde_json::json!({ "query": "hello" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body["response"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ingest_then_answer_and_count() {
        let state = test_state().await;

        let text = "Q: How do I add a product?\nA: Open Catalogue and press Add Product.";
        let (status, body) = send(
            &state,
            post_json("/create-embedding", serde_json::json!({ "text": text, "metadata": {"source": "api"} })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["embedding_result"]["partition"], "documents");
        assert_eq!(body["embedding_result"]["stored"], 1);

        let (_, body) = send(&state, get("/count")).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["english"], 1);
        assert_eq!(body["arabic"], 0);
        assert_eq!(body["total"], 1);

        let (_, body) = send(
            &state,
            post_json("/rag_chat", serde_json::json!({ "query": "How many articles are loaded" })),
        )
        .await;
        assert_eq!(body["response"], "There are currently 1 articles loaded into the system.");

        let (_, body) = send(&state, post_json("/rag_chat", serde_json::json!({ "query": "add a product" }))).await;
        assert_eq!(body["response"], text);
    }

    #[tokio::test]
    async fn test_arabic_text_goes_to_fallback_partition() {
        let state = test_state().await;
        let (status, body) = send(
            &state,
            post_json("/create-embedding", serde_json::json!({ "text": "كيف أضيف منتج جديد" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["embedding_result"]["partition"], state.config.routing.fallback.collection);

        let (_, body) = send(&state, get("/health")).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["partitions"]["arabic"], 1);
        assert_eq!(body["partitions"]["english"], 0);
    }

    #[tokio::test]
    async fn test_debug_search_lists_hits() {
        let state = test_state().await;
        state
            .ingestor
            .add_texts(
                &["Q: Reset password\nA: Use the login screen link.".to_string()],
                &[],
            )
            .await
            .unwrap();

        let (status, body) = send(
            &state,
            post_json("/debug-search", serde_json::json!({ "query": "reset password", "k": 3 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], "reset password");
        assert_eq!(body["total_results"], 1);
        assert_eq!(body["results"][0]["rank"], 1);
        assert_eq!(body["results"][0]["table"], "documents");
    }

    #[tokio::test]
    async fn test_empty_store_returns_fallback_message() {
        let state = test_state().await;
        let (_, body) = send(
            &state,
            post_json("/rag_chat", serde_json::json!({ "query": "where is the invoice settings page" })),
        )
        .await;
        assert_eq!(body["response"], state.orchestrator.fallback_message());
    }
}
