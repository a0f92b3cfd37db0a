//! Domain types for the todo service.
//!
//! Holds the identifier scheme, the [`Todo`](todo::Todo) entity with its JSON
//! mapping, and the domain error type shared by the storage and HTTP layers.

pub mod error;
pub mod id;
pub mod todo;
pub mod types;
