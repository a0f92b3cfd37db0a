use std::time::Duration;

/// Errors surfaced by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The MongoDB driver reported a connection, query or write failure.
    #[error("Store driver error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store operation `{operation}` timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// A todo could not be converted into a document.
    #[error("Failed to encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),

    /// A stored document does not have the shape of a todo.
    #[error("Failed to decode document: {0}")]
    Decode(String),
}

impl StoreError {
    /// `true` when the store answered but its data could not be mapped.
    /// Every other variant means the store itself was unreachable or failed.
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, StoreError::Decode(_))
    }
}
