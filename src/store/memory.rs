//! In-process document store.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TicketStore};
use crate::ticket::{Ticket, TicketChanges, TicketDraft};

/// Keeps tickets in insertion order behind a read/write lock.
///
/// Ids are UUID v4 strings; anything that does not parse as a UUID is
/// rejected with [`StoreError::InvalidId`], mirroring how a document store
/// refuses to cast a malformed object id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tickets: RwLock<Vec<Ticket>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn parse_id(id: &str) -> Result<String, StoreError> {
    Uuid::parse_str(id)
        .map(|uuid| uuid.to_string())
        .map_err(|_| StoreError::InvalidId(id.to_owned()))
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn insert(&self, draft: TicketDraft) -> Result<Ticket, StoreError> {
        let ticket = draft.into_ticket(Uuid::new_v4().to_string());
        self.tickets.write().await.push(ticket.clone());
        Ok(ticket)
    }

    async fn find_all(&self) -> Result<Vec<Ticket>, StoreError> {
        Ok(self.tickets.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, StoreError> {
        let id = parse_id(id)?;
        Ok(self.tickets.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn update_by_id(&self, id: &str, changes: TicketChanges) -> Result<Option<Ticket>, StoreError> {
        let id = parse_id(id)?;
        let mut tickets = self.tickets.write().await;
        Ok(tickets.iter_mut().find(|t| t.id == id).map(|ticket| {
            ticket.apply(&changes);
            ticket.clone()
        }))
    }

    async fn delete_by_id(&self, id: &str) -> Result<Option<Ticket>, StoreError> {
        let id = parse_id(id)?;
        let mut tickets = self.tickets.write().await;
        Ok(tickets.iter().position(|t| t.id == id).map(|i| tickets.remove(i)))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
