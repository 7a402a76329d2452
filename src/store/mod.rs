//! The persistence gateway.
//!
//! [`TicketStore`] is the only contract handlers have with storage: five
//! record operations plus a health probe, each ending in success,
//! "not found" (`Ok(None)`), or a [`StoreError`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::ticket::{Ticket, TicketChanges, TicketDraft};

mod memory;
#[cfg(feature = "mongo")]
mod mongo;
mod unavailable;

pub use memory::MemoryStore;
#[cfg(feature = "mongo")]
pub use mongo::MongoStore;
pub use unavailable::UnavailableStore;

/// Connection-string scheme that selects the in-process store.
pub const MEMORY_SCHEME: &str = "memory://";

/// Reason reported by every operation when no connection string is configured.
pub const MISSING_URL: &str = "MONGO_URI must be set";

/// A store handle shared by every handler for the process lifetime.
pub type SharedStore = Arc<dyn TicketStore>;

/// A storage failure. Its message is passed through to the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The identifier cannot name any record in this store.
    #[error("Cast to id failed for value \"{0}\"")]
    InvalidId(String),

    /// Connection loss, driver failure, or a store that never came up.
    #[error("{0}")]
    Backend(String),
}

#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Persists a validated draft and returns it with its generated id.
    async fn insert(&self, draft: TicketDraft) -> Result<Ticket, StoreError>;

    /// Every stored ticket, in natural storage order.
    async fn find_all(&self) -> Result<Vec<Ticket>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, StoreError>;

    /// Applies exactly the fields in `changes` and returns the updated record.
    async fn update_by_id(&self, id: &str, changes: TicketChanges) -> Result<Option<Ticket>, StoreError>;

    /// Removes a ticket and returns what was removed.
    async fn delete_by_id(&self, id: &str) -> Result<Option<Ticket>, StoreError>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Builds the store named by `url`.
///
/// `memory://` selects [`MemoryStore`]; anything else is handed to the
/// MongoDB driver. Only a malformed connection string fails here; an
/// unreachable server surfaces later, through [`TicketStore::ping`] and the
/// first operations.
pub async fn connect(url: &str, database: Option<&str>) -> Result<SharedStore, StoreError> {
    if url.starts_with(MEMORY_SCHEME) {
        return Ok(Arc::new(MemoryStore::new()));
    }
    connect_document_store(url, database).await
}

/// Opens the store for the process lifetime and never fails.
///
/// A missing or rejected connection string is logged and replaced by an
/// [`UnavailableStore`] carrying the reason, so the server still listens and
/// each request reports the problem. A store that does open is pinged in the
/// background, so listening never waits on server selection.
pub async fn open(url: Option<&str>, database: Option<&str>) -> SharedStore {
    let result = match url {
        Some(url) => connect(url, database).await,
        None => Err(StoreError::Backend(MISSING_URL.to_owned())),
    };
    let store = match result {
        Ok(store) => store,
        Err(e) => {
            error!("database connection error: {e}");
            return Arc::new(UnavailableStore::new(e.to_string()));
        }
    };

    let check = Arc::clone(&store);
    tokio::spawn(async move {
        match check.ping().await {
            Ok(()) => info!("database connected"),
            Err(e) => error!("database connection error: {e}"),
        }
    });
    store
}

#[cfg(feature = "mongo")]
async fn connect_document_store(url: &str, database: Option<&str>) -> Result<SharedStore, StoreError> {
    Ok(Arc::new(MongoStore::connect(url, database).await?))
}

#[cfg(not(feature = "mongo"))]
async fn connect_document_store(url: &str, _database: Option<&str>) -> Result<SharedStore, StoreError> {
    Err(StoreError::Backend(format!(
        "cannot open `{url}`: ticketd was built without the `mongo` feature"
    )))
}
