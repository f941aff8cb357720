//! Liveness endpoints. Both are on the public allow-list.

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Create the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}

/// Root response.
#[derive(Debug, Serialize)]
struct RootResponse {
    message: &'static str,
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "todo-api is running",
    })
}

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Basic health check.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
