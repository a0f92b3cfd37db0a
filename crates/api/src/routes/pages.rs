use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::state::AppState;

/// Home page and static assets, served from `static_dir`.
///
/// ```text
/// GET /              -> {static_dir}/index.html
/// GET /favicon.ico   -> {static_dir}/favicon.ico
/// GET /static/*      -> {static_dir}/*
/// ```
pub fn router(static_dir: &Path) -> Router<AppState> {
    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route_service("/favicon.ico", ServeFile::new(static_dir.join("favicon.ico")))
        .nest_service("/static", ServeDir::new(static_dir))
}
