use std::sync::Arc;

use todos_db::TodoRepo;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Built once at startup and passed explicitly, so tests can construct an
/// isolated instance over their own store.
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway for todo documents.
    pub todos: TodoRepo,
    pub config: Arc<ServerConfig>,
}
