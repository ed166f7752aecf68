//! Ticket store contract.
//!
//! Plain create/read operations keyed by a store-generated identifier. The
//! store holds no decrement logic; stock lives with the event service.

use crate::domain::{Ticket, TicketId, TicketStatus};
use async_trait::async_trait;
use platform_core::Result;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryTicketStore;
pub use postgres::PostgresTicketStore;

/// Persistence contract for ticket documents.
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Persist a new ticket.
    async fn create(&self, ticket: Ticket) -> Result<Ticket>;

    /// Fetch a ticket by id; not-found when absent.
    async fn get(&self, id: TicketId) -> Result<Ticket>;

    /// All tickets purchased by one user.
    async fn get_by_user(&self, user_id: &str) -> Result<Vec<Ticket>>;

    /// Atomically move a ticket from `expected` to `next`, returning the
    /// post-update record.
    ///
    /// Zero rows matched means the ticket is absent (not-found) or its
    /// status moved concurrently (invalid-argument); the conditional write
    /// distinguishes the two by a follow-up read.
    async fn update_status(
        &self,
        id: TicketId,
        expected: TicketStatus,
        next: TicketStatus,
    ) -> Result<Ticket>;

    /// Tickets representing current demand for an event:
    /// status RESERVED or CONFIRMED.
    async fn active_for_event(&self, event_id: &str) -> Result<Vec<Ticket>>;
}
