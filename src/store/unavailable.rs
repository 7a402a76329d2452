//! Placeholder store for a process whose database never came up.

use async_trait::async_trait;

use super::{StoreError, TicketStore};
use crate::ticket::{Ticket, TicketChanges, TicketDraft};

/// Fails every operation with the original connection error, so the server
/// can keep listening and report the problem per request.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    fn fail<T>(&self) -> Result<T, StoreError> {
        Err(StoreError::Backend(self.reason.clone()))
    }
}

#[async_trait]
impl TicketStore for UnavailableStore {
    async fn insert(&self, _draft: TicketDraft) -> Result<Ticket, StoreError> { self.fail() }
    async fn find_all(&self) -> Result<Vec<Ticket>, StoreError> { self.fail() }
    async fn find_by_id(&self, _id: &str) -> Result<Option<Ticket>, StoreError> { self.fail() }
    async fn update_by_id(&self, _id: &str, _changes: TicketChanges) -> Result<Option<Ticket>, StoreError> { self.fail() }
    async fn delete_by_id(&self, _id: &str) -> Result<Option<Ticket>, StoreError> { self.fail() }
    async fn ping(&self) -> Result<(), StoreError> { self.fail() }
}
