//! Error type returned by route handlers.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::store::StoreError;

/// Every failure a handler can produce, mapped to one HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Required field missing or blank.
    #[error("{field} is required")]
    Validation { field: &'static str },
    /// The id does not name a stored todo, or is not an id at all.
    #[error("todo {0} not found")]
    NotFound(String),
    /// The store cannot assign another id.
    #[error("no todo ids left to assign")]
    IdsExhausted,
    /// The request body could not be parsed.
    #[error(transparent)]
    InvalidBody(#[from] JsonRejection),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::IdsExhausted => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvalidBody(rejection) => rejection.status(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation { field } => Self::Validation { field },
            StoreError::NotFound(id) => Self::NotFound(id.to_string()),
            StoreError::IdsExhausted => Self::IdsExhausted,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::InvalidBody(rejection) => rejection.body_text(),
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;
