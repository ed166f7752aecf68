//! In-memory ticket store for tests and in-process wiring.

use super::TicketStore;
use crate::domain::{Ticket, TicketId, TicketStatus};
use async_trait::async_trait;
use chrono::Utc;
use platform_core::{Error, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory implementation of [`TicketStore`].
#[derive(Default)]
pub struct InMemoryTicketStore {
    tickets: RwLock<HashMap<TicketId, Ticket>>,
}

impl InMemoryTicketStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tickets; used by tests asserting "no ticket was
    /// created".
    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }

    /// Whether the store holds no tickets.
    pub async fn is_empty(&self) -> bool {
        self.tickets.read().await.is_empty()
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn create(&self, ticket: Ticket) -> Result<Ticket> {
        let mut tickets = self.tickets.write().await;
        tickets.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    async fn get(&self, id: TicketId) -> Result<Ticket> {
        let tickets = self.tickets.read().await;
        tickets
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("ticket", id))
    }

    async fn get_by_user(&self, user_id: &str) -> Result<Vec<Ticket>> {
        let tickets = self.tickets.read().await;
        let mut matching: Vec<Ticket> = tickets
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }

    async fn update_status(
        &self,
        id: TicketId,
        expected: TicketStatus,
        next: TicketStatus,
    ) -> Result<Ticket> {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("ticket", id))?;

        if ticket.status != expected {
            return Err(Error::invalid_argument(format!(
                "ticket {id} is no longer {expected} (now {})",
                ticket.status
            )));
        }

        ticket.status = next;
        ticket.updated_at = Utc::now();
        Ok(ticket.clone())
    }

    async fn active_for_event(&self, event_id: &str) -> Result<Vec<Ticket>> {
        let tickets = self.tickets.read().await;
        Ok(tickets
            .values()
            .filter(|t| {
                t.event_id == event_id
                    && matches!(t.status, TicketStatus::Reserved | TicketStatus::Confirmed)
            })
            .cloned()
            .collect())
    }
}
