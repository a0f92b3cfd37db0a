mod todo_repo;

pub use todo_repo::{StoreTimeouts, TodoRepo};
