//! Document representation of a todo.
//!
//! Stored shape: `{ _id: ObjectId, title: string, completed: bool, createdAt: date }`.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, doc, DateTime, Document};
use serde::{Deserialize, Serialize};
use todos_core::id::TodoId;
use todos_core::todo::{Todo, TodoFields};
use todos_core::types::Timestamp;

use crate::error::StoreError;

/// A todo as held in the `todos` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodoDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime,
}

impl TodoDocument {
    pub fn from_document(document: Document) -> Result<Self, StoreError> {
        bson::from_document(document).map_err(|e| StoreError::Decode(e.to_string()))
    }

    pub fn to_document(&self) -> Result<Document, StoreError> {
        Ok(bson::to_document(self)?)
    }

    pub fn into_todo(self) -> Result<Todo, StoreError> {
        let millis = self.created_at.timestamp_millis();
        let created_at = Timestamp::from_timestamp_millis(millis).ok_or_else(|| {
            StoreError::Decode(format!("createdAt out of range: {millis}ms"))
        })?;

        Ok(Todo {
            id: TodoId::from_bytes(self.id.bytes()),
            title: self.title,
            completed: self.completed,
            created_at,
        })
    }
}

impl From<&Todo> for TodoDocument {
    fn from(todo: &Todo) -> Self {
        Self {
            id: object_id(todo.id),
            title: todo.title.clone(),
            completed: todo.completed,
            created_at: DateTime::from_millis(todo.created_at.timestamp_millis()),
        }
    }
}

pub fn object_id(id: TodoId) -> ObjectId {
    ObjectId::from_bytes(id.bytes())
}

/// Filter matching the document with the given id.
pub fn id_filter(id: TodoId) -> Document {
    doc! { "_id": object_id(id) }
}

/// Partial update touching only the client-settable fields.
pub fn set_fields(fields: &TodoFields) -> Document {
    doc! {
        "$set": {
            "title": fields.title.clone(),
            "completed": fields.completed,
        }
    }
}
