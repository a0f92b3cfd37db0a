//! Handlers for the `/api/v1/todos` resource.
//!
//! Update and delete report success when no todo has the given id. The
//! success message therefore does not confirm that a todo existed.

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use todos_core::error::CoreError;
use todos_core::id::{ParseTodoIdError, TodoId};
use todos_core::todo::{self, Todo};

use crate::error::{AppError, AppResult};
use crate::response::{json_body, MessageResponse};
use crate::state::AppState;

/// GET /api/v1/todos
///
/// List every todo as `{"data": [...]}`.
pub async fn list_todos(State(state): State<AppState>) -> AppResult<Response> {
    let todos = state.todos.list_all().await.map_err(|source| {
        let message = if source.is_decode_failure() {
            "Failed to decode todos"
        } else {
            "Failed to fetch todos"
        };
        AppError::Store { message, source }
    })?;

    let body = todo::encode_list(&todos).map_err(|e| AppError::InternalError(e.to_string()))?;
    Ok(json_body(StatusCode::OK, body))
}

/// POST /api/v1/todos
///
/// Create a todo. The id and `createdAt` are assigned here; client-supplied
/// values for them are ignored.
pub async fn create_todo(State(state): State<AppState>, body: Bytes) -> AppResult<Response> {
    let fields = todo::decode_create_request(&body)?;
    fields.validate_for_create()?;

    let created = Todo::new(fields);
    state
        .todos
        .insert(&created)
        .await
        .map_err(AppError::store("Failed to create todo"))?;

    tracing::info!(todo_id = %created.id, "Todo created");

    let body = todo::encode(&created).map_err(|e| AppError::InternalError(e.to_string()))?;
    Ok(json_body(StatusCode::CREATED, body))
}

/// PUT /api/v1/todos/{id}
///
/// Overwrite a todo's `title` and `completed`.
pub async fn update_todo(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(path)?;
    let fields = todo::decode_update_request(&body)?;

    state
        .todos
        .update_by_id(id, &fields)
        .await
        .map_err(AppError::store("Failed to update todo"))?;

    tracing::info!(todo_id = %id, "Todo updated");

    Ok(Json(MessageResponse {
        message: "Todo updated successfully",
    }))
}

/// DELETE /api/v1/todos/{id}
pub async fn delete_todo(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(path)?;

    state
        .todos
        .delete_by_id(id)
        .await
        .map_err(AppError::store("Failed to delete todo"))?;

    tracing::info!(todo_id = %id, "Todo deleted");

    Ok(Json(MessageResponse {
        message: "Todo deleted successfully",
    }))
}

/// Any path that cannot be read as text (e.g. `%FF`) is an invalid id too.
fn parse_id(path: Result<Path<String>, PathRejection>) -> Result<TodoId, AppError> {
    let Path(raw) = path.map_err(|rejection| {
        tracing::debug!(%rejection, "Rejected todo id path segment");
        CoreError::from(ParseTodoIdError::InvalidEncoding)
    })?;
    Ok(TodoId::parse(&raw).map_err(CoreError::from)?)
}
