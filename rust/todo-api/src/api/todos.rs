//! Todo CRUD endpoints.
//!
//! Each route maps to exactly one [`TodoStore`](crate::store::TodoStore)
//! operation.

use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    routing::get,
    Json, Router,
};

use super::error::{ApiError, ApiResult};
use crate::domain::{NewTodo, Todo, TodoId, TodoPatch};
use crate::AppState;

/// Todo routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo)
                .put(update_todo)
                .patch(toggle_todo)
                .delete(delete_todo),
        )
}

/// The `{id}` segment of `/todos/{id}`.
///
/// Anything that is not a numeric id, including segments that do not decode
/// to UTF-8, cannot name a todo and is answered with 404.
#[derive(Debug, Clone, Copy)]
pub struct TodoIdPath(pub TodoId);

impl<S> FromRequestParts<S> for TodoIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(raw)) => raw,
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Unreadable todo id");
                let segment = parts.uri.path().rsplit('/').next().unwrap_or_default();
                return Err(ApiError::NotFound(segment.to_string()));
            }
        };
        raw.parse()
            .map(Self)
            .map_err(|_: std::num::ParseIntError| ApiError::NotFound(raw))
    }
}

/// Create a todo.
pub async fn create_todo(
    State(state): State<AppState>,
    body: Result<Json<NewTodo>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let Json(input) = body?;
    let todo = state.todos.create(input)?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// List all todos in insertion order.
pub async fn list_todos(State(state): State<AppState>) -> Json<Vec<Todo>> {
    Json(state.todos.list())
}

/// Get one todo.
pub async fn get_todo(
    State(state): State<AppState>,
    TodoIdPath(id): TodoIdPath,
) -> ApiResult<Json<Todo>> {
    Ok(Json(state.todos.get(id)?))
}

/// Merge the provided fields into a todo.
pub async fn update_todo(
    State(state): State<AppState>,
    TodoIdPath(id): TodoIdPath,
    body: Result<Json<TodoPatch>, JsonRejection>,
) -> ApiResult<Json<Todo>> {
    let Json(patch) = body?;
    Ok(Json(state.todos.update(id, patch)?))
}

/// Flip the completion flag.
pub async fn toggle_todo(
    State(state): State<AppState>,
    TodoIdPath(id): TodoIdPath,
) -> ApiResult<Json<Todo>> {
    Ok(Json(state.todos.toggle(id)?))
}

/// Delete a todo.
pub async fn delete_todo(
    State(state): State<AppState>,
    TodoIdPath(id): TodoIdPath,
) -> ApiResult<StatusCode> {
    state.todos.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
