use async_trait::async_trait;
use mongodb::bson::Document;

use crate::error::StoreError;

/// A named collection of documents in the backing store.
///
/// Filters are equality matches on top-level fields. Updates use the
/// `$set` operator. Operations on a filter that matches nothing succeed and
/// report a count of zero.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// All documents matching `filter`, in store iteration order.
    async fn find(&self, filter: Document) -> Result<Vec<Document>, StoreError>;

    async fn insert_one(&self, document: Document) -> Result<(), StoreError>;

    /// Apply `update` to the first document matching `filter`.
    /// Returns the number of documents matched (0 or 1).
    async fn update_one(&self, filter: Document, update: Document) -> Result<u64, StoreError>;

    /// Remove the first document matching `filter`.
    /// Returns the number of documents deleted (0 or 1).
    async fn delete_one(&self, filter: Document) -> Result<u64, StoreError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
