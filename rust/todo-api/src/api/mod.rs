//! HTTP API endpoints.

pub mod error;
pub mod health;
pub mod todos;

pub use error::{ApiError, ApiResult};

use axum::Router;

use crate::AppState;

/// Create the API router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(todos::router())
}
