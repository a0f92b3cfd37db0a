//! MongoDB-backed [`DocumentCollection`].

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};

use crate::collection::DocumentCollection;
use crate::error::StoreError;

const APP_NAME: &str = "todos-api";

/// A collection in a MongoDB database.
///
/// Cloning is cheap; the driver handle is shared and pools its connections.
#[derive(Clone)]
pub struct MongoCollection {
    db: Database,
    collection: Collection<Document>,
}

impl MongoCollection {
    pub fn new(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<Document>(collection_name);
        Self { db, collection }
    }

    pub fn name(&self) -> &str {
        self.collection.name()
    }
}

/// Connect to MongoDB and verify the server answers a ping within `timeout`.
pub async fn connect(
    uri: &str,
    db_name: &str,
    collection_name: &str,
    timeout: Duration,
) -> Result<MongoCollection, StoreError> {
    let mut options = ClientOptions::parse(uri).await?;
    options.app_name = Some(APP_NAME.into());
    options.connect_timeout = Some(timeout);
    options.server_selection_timeout = Some(timeout);

    let client = Client::with_options(options)?;
    let collection = MongoCollection::new(client.database(db_name), collection_name);

    tokio::time::timeout(timeout, collection.ping())
        .await
        .map_err(|_| StoreError::Timeout {
            operation: "ping",
            after: timeout,
        })??;

    tracing::debug!(db = db_name, collection = collection_name, "MongoDB ping succeeded");
    Ok(collection)
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn find(&self, filter: Document) -> Result<Vec<Document>, StoreError> {
        let cursor = self.collection.find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_one(&self, document: Document) -> Result<(), StoreError> {
        self.collection.insert_one(document).await?;
        Ok(())
    }

    async fn update_one(&self, filter: Document, update: Document) -> Result<u64, StoreError> {
        let result = self.collection.update_one(filter, update).await?;
        Ok(result.matched_count)
    }

    async fn delete_one(&self, filter: Document) -> Result<u64, StoreError> {
        let result = self.collection.delete_one(filter).await?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
