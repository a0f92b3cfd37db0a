use crate::id::ParseTodoIdError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] ParseTodoIdError),

    #[error("Malformed body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}
