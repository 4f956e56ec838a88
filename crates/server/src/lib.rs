//! Query Router Server
//!
//! HTTP endpoints for the Tijarah360 support assistant and shared bootstrap
//! for the `query-router` and `kb-admin` binaries.

pub mod http;
pub mod logging;
pub mod state;

pub use http::create_router;
pub use logging::init_tracing;
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Startup error: {0}")]
    Startup(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<&ServerError> for StatusCode {
    fn from(err: &ServerError) -> Self {
        match err {
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Startup(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<query_router_rag::RagError> for ServerError {
    fn from(err: query_router_rag::RagError) -> Self {
        ServerError::Internal(err.to_string())
    }
}

impl From<ServerError> for query_router_core::Error {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::InvalidRequest(msg) => query_router_core::Error::InvalidInput(msg),
            other => query_router_core::Error::Config(other.to_string()),
        }
    }
}
