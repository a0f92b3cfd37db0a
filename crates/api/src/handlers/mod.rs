//! Request handlers.
//!
//! Handlers validate input, delegate to the [`TodoRepo`](todos_db::TodoRepo)
//! in [`AppState`](crate::state::AppState) and map errors via
//! [`AppError`](crate::error::AppError).

pub mod todos;
