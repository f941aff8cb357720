//! Shared-secret bearer token authentication.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::AuthConfig;

/// Authentication error response.
#[derive(Debug, Serialize)]
pub struct AuthError {
    pub error: &'static str,
}

impl AuthError {
    /// The single rejection every protected route returns.
    pub const UNAUTHORIZED: Self = Self {
        error: "unauthorized",
    };
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = StatusCode::UNAUTHORIZED;
        let body = Json(self);
        (status, body).into_response()
    }
}

/// Decides whether a request may proceed.
///
/// Only the request path and the raw `Authorization` value are consulted.
#[derive(Clone)]
pub struct AuthGate {
    expected: String,
    public_paths: Vec<String>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("expected", &"Bearer <redacted>")
            .field("public_paths", &self.public_paths)
            .finish()
    }
}

impl AuthGate {
    /// Build a gate expecting `Bearer <secret>`.
    pub fn new(secret: &str, public_paths: Vec<String>) -> Self {
        Self {
            expected: format!("Bearer {secret}"),
            public_paths,
        }
    }

    /// Build a gate from configuration.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.api_key, config.public_paths.clone())
    }

    /// Whether `path` bypasses authentication.
    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|p| p == path)
    }

    /// Whether a request to `path` carrying `authorization` is admitted.
    ///
    /// The header must equal `Bearer <secret>` exactly.
    pub fn admits(&self, path: &str, authorization: Option<&str>) -> bool {
        self.is_public(path) || authorization == Some(self.expected.as_str())
    }
}

/// Authentication middleware. Runs before routing and body extraction.
pub async fn auth_middleware(
    State(state): State<crate::AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let path = req.uri().path();
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    if !state.auth.admits(path, auth_header) {
        tracing::debug!(
            path = %path,
            has_header = auth_header.is_some(),
            "Rejected unauthenticated request"
        );
        return Err(AuthError::UNAUTHORIZED);
    }

    Ok(next.run(req).await)
}
