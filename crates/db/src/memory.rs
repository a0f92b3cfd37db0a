//! In-process [`DocumentCollection`].
//!
//! Keeps documents in insertion order behind a [`RwLock`]. Supports the
//! subset of the MongoDB query language the todo repository uses: top-level
//! equality filters and `$set` updates. Inserting a second document with an
//! existing `_id` is rejected like a unique-index violation.

use async_trait::async_trait;
use mongodb::bson::Document;
use tokio::sync::RwLock;

use crate::collection::DocumentCollection;
use crate::error::StoreError;

#[derive(Debug, Default)]
pub struct MemoryCollection {
    documents: RwLock<Vec<Document>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of documents, stored as given.
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, value)| document.get(key) == Some(value))
}

fn apply_update(document: &mut Document, update: &Document) -> Result<(), StoreError> {
    for (operator, fields) in update {
        if operator != "$set" {
            return Err(StoreError::Unavailable(format!(
                "unsupported update operator `{operator}`"
            )));
        }
        let fields = fields.as_document().ok_or_else(|| {
            StoreError::Unavailable("`$set` expects a document of fields".into())
        })?;
        for (key, value) in fields {
            document.insert(key.clone(), value.clone());
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn find(&self, filter: Document) -> Result<Vec<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .filter(|doc| matches(doc, &filter))
            .cloned()
            .collect())
    }

    async fn insert_one(&self, document: Document) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        if let Some(id) = document.get("_id") {
            if documents.iter().any(|doc| doc.get("_id") == Some(id)) {
                return Err(StoreError::Unavailable(format!("duplicate key: _id {id}")));
            }
        }
        documents.push(document);
        Ok(())
    }

    async fn update_one(&self, filter: Document, update: Document) -> Result<u64, StoreError> {
        let mut documents = self.documents.write().await;
        match documents.iter_mut().find(|doc| matches(doc, &filter)) {
            Some(doc) => {
                apply_update(doc, &update)?;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_one(&self, filter: Document) -> Result<u64, StoreError> {
        let mut documents = self.documents.write().await;
        match documents.iter().position(|doc| matches(doc, &filter)) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
