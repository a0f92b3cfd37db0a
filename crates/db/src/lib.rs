//! Persistence for todo documents.
//!
//! [`DocumentCollection`] is the seam to the document store. It is
//! implemented over MongoDB ([`MongoCollection`]) and in process
//! ([`MemoryCollection`]). [`TodoRepo`] maps todos onto documents and bounds
//! every store call with a timeout.

pub mod collection;
pub mod error;
pub mod memory;
pub mod models;
pub mod mongo;
pub mod repositories;

pub use collection::DocumentCollection;
pub use error::StoreError;
pub use memory::MemoryCollection;
pub use mongo::MongoCollection;
pub use repositories::{StoreTimeouts, TodoRepo};
