//! Repository for the `todos` collection.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use mongodb::bson::Document;
use todos_core::id::TodoId;
use todos_core::todo::{Todo, TodoFields};

use crate::collection::DocumentCollection;
use crate::error::StoreError;
use crate::models::todo::{id_filter, set_fields, TodoDocument};

/// Default budget for reads (list, ping).
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Default budget for writes (insert, update, delete).
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-operation time budgets for store calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreTimeouts {
    pub read: Duration,
    pub write: Duration,
}

impl Default for StoreTimeouts {
    fn default() -> Self {
        Self {
            read: DEFAULT_READ_TIMEOUT,
            write: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

/// Maps todos onto a [`DocumentCollection`].
///
/// Cheap to clone; the collection handle is shared between all clones and
/// carries no per-request state. Update and delete succeed when no document
/// has the given id, so callers get no not-found signal from this layer.
#[derive(Clone)]
pub struct TodoRepo {
    collection: Arc<dyn DocumentCollection>,
    timeouts: StoreTimeouts,
}

impl TodoRepo {
    pub fn new(collection: Arc<dyn DocumentCollection>, timeouts: StoreTimeouts) -> Self {
        Self {
            collection,
            timeouts,
        }
    }

    pub fn timeouts(&self) -> StoreTimeouts {
        self.timeouts
    }

    /// List every todo, ordered by `created_at` then id.
    pub async fn list_all(&self) -> Result<Vec<Todo>, StoreError> {
        let documents = bounded(
            "find",
            self.timeouts.read,
            self.collection.find(Document::new()),
        )
        .await?;

        let mut todos = documents
            .into_iter()
            .map(|doc| TodoDocument::from_document(doc)?.into_todo())
            .collect::<Result<Vec<_>, _>>()?;

        todos.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(todos)
    }

    /// Store a new todo. Not idempotent: the id is assigned by the caller.
    pub async fn insert(&self, todo: &Todo) -> Result<(), StoreError> {
        let document = TodoDocument::from(todo).to_document()?;
        bounded(
            "insert_one",
            self.timeouts.write,
            self.collection.insert_one(document),
        )
        .await
    }

    /// Overwrite `title` and `completed` of the todo with `id`, if it exists.
    pub async fn update_by_id(&self, id: TodoId, fields: &TodoFields) -> Result<(), StoreError> {
        let matched = bounded(
            "update_one",
            self.timeouts.write,
            self.collection.update_one(id_filter(id), set_fields(fields)),
        )
        .await?;

        if matched == 0 {
            tracing::debug!(%id, "Update matched no document");
        }
        Ok(())
    }

    /// Remove the todo with `id`, if it exists.
    pub async fn delete_by_id(&self, id: TodoId) -> Result<(), StoreError> {
        let deleted = bounded(
            "delete_one",
            self.timeouts.write,
            self.collection.delete_one(id_filter(id)),
        )
        .await?;

        if deleted == 0 {
            tracing::debug!(%id, "Delete matched no document");
        }
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        bounded("ping", self.timeouts.read, self.collection.ping()).await
    }
}

/// Run a store call, failing with [`StoreError::Timeout`] once `after` elapses.
/// The call is dropped, and so cancelled, when the budget runs out.
async fn bounded<T>(
    operation: &'static str,
    after: Duration,
    call: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    match tokio::time::timeout(after, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, ?after, "Store operation timed out");
            Err(StoreError::Timeout { operation, after })
        }
    }
}
