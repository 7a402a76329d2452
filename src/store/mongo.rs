//! MongoDB-backed store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Document, doc};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{StoreError, TicketStore};
use crate::ticket::{Ticket, TicketChanges, TicketDraft, TicketStatus};

/// Database used when neither the config nor the connection string names one.
pub const DEFAULT_DATABASE: &str = "tickets";
const COLLECTION: &str = "tickets";

/// Stores each ticket as one document in the `tickets` collection, keyed by
/// an `ObjectId` that doubles as the ticket id on the wire.
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
    collection: Collection<TicketDocument>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    description: String,
    status: TicketStatus,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

impl From<TicketDocument> for Ticket {
    fn from(doc: TicketDocument) -> Self {
        Ticket {
            id: doc.id.to_hex(),
            title: doc.title,
            description: doc.description,
            status: doc.status,
            created_at: from_bson_date(doc.created_at),
            updated_at: from_bson_date(doc.updated_at),
        }
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(e: mongodb::error::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

fn to_bson_date(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn from_bson_date(at: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or_default()
}

fn object_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_owned()))
}

impl MongoStore {
    /// Creates the driver client. The driver connects lazily, so this only
    /// fails on a malformed connection string.
    pub async fn connect(url: &str, database: Option<&str>) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(url).await?;
        let database = match database {
            Some(name) => client.database(name),
            None => client.default_database().unwrap_or_else(|| client.database(DEFAULT_DATABASE)),
        };
        debug!(database = database.name(), "mongodb client created");
        Ok(Self::from_database(database))
    }

    pub fn from_database(database: Database) -> Self {
        let collection = database.collection(COLLECTION);
        Self { database, collection }
    }
}

#[async_trait]
impl TicketStore for MongoStore {
    async fn insert(&self, draft: TicketDraft) -> Result<Ticket, StoreError> {
        let doc = TicketDocument {
            id: ObjectId::new(),
            title: draft.title,
            description: draft.description,
            status: draft.status,
            created_at: to_bson_date(draft.created_at),
            updated_at: to_bson_date(draft.updated_at),
        };
        self.collection.insert_one(&doc).await?;
        Ok(doc.into())
    }

    async fn find_all(&self) -> Result<Vec<Ticket>, StoreError> {
        let docs: Vec<TicketDocument> = self.collection.find(doc! {}).await?.try_collect().await?;
        Ok(docs.into_iter().map(Ticket::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, StoreError> {
        let filter = doc! { "_id": object_id(id)? };
        Ok(self.collection.find_one(filter).await?.map(Ticket::from))
    }

    async fn update_by_id(&self, id: &str, changes: TicketChanges) -> Result<Option<Ticket>, StoreError> {
        let filter = doc! { "_id": object_id(id)? };

        let mut set = Document::new();
        if let Some(title) = changes.title {
            set.insert("title", title);
        }
        if let Some(description) = changes.description {
            set.insert("description", description);
        }
        if let Some(status) = changes.status {
            set.insert("status", status.as_str());
        }

        // `$max` keeps updatedAt monotonic; an empty `$set` is rejected by the server.
        let mut update = doc! { "$max": { "updatedAt": to_bson_date(changes.updated_at) } };
        if !set.is_empty() {
            update.insert("$set", set);
        }

        let updated = self.collection
            .find_one_and_update(filter, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(Ticket::from))
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Ticket>, StoreError> {
        let filter = doc! { "_id": object_id(id)? };
        Ok(self.collection.find_one_and_delete(filter).await?.map(Ticket::from))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_object_ids_are_rejected() {
        assert_eq!(object_id("123"), Err(StoreError::InvalidId("123".into())));
        assert!(object_id("65f1c0ffee0000000000beef").is_ok());
    }

    #[test]
    fn documents_convert_to_tickets_with_hex_ids() {
        let now = Utc::now();
        let doc = TicketDocument {
            id: ObjectId::new(),
            title: "Login issue".into(),
            description: "User cannot log in to the system.".into(),
            status: TicketStatus::InProgress,
            created_at: to_bson_date(now),
            updated_at: to_bson_date(now),
        };
        let hex = doc.id.to_hex();
        let ticket = Ticket::from(doc);
        assert_eq!(ticket.id, hex);
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.created_at.timestamp_millis(), now.timestamp_millis());
    }

    #[test]
    fn documents_use_camel_case_fields_and_object_id_key() {
        let now = Utc::now();
        let doc = TicketDocument {
            id: ObjectId::new(),
            title: "Login issue".into(),
            description: "User cannot log in to the system.".into(),
            status: TicketStatus::Open,
            created_at: to_bson_date(now),
            updated_at: to_bson_date(now),
        };
        let raw = bson::to_document(&doc).unwrap();
        assert!(raw.get_object_id("_id").is_ok());
        assert_eq!(raw.get_str("status").unwrap(), "Open");
        assert!(raw.get_datetime("createdAt").is_ok());
    }
}
