pub mod health;
pub mod pages;
pub mod todos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /todos                list (GET), create (POST)
/// /todos/{id}           update (PUT), delete (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(todos::router())
}
