//! Ticket service API contract and wire types.

use crate::domain::{Ticket, TicketStatus, TicketTransition};
use async_trait::async_trait;
use platform_core::Result;
use serde::{Deserialize, Serialize};

/// Request to purchase tickets for an event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PurchaseTicketRequest {
    /// Target event
    pub event_id: String,
    /// Purchasing user
    pub user_id: String,
    /// Number of tickets
    pub quantity: i32,
}

/// External view of a ticket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TicketResponse {
    /// Ticket identifier
    pub id: String,
    /// Referenced event
    pub event_id: String,
    /// Owning user
    pub user_id: String,
    /// Lifecycle state
    pub status: TicketStatus,
}

impl From<&Ticket> for TicketResponse {
    fn from(ticket: &Ticket) -> Self {
        Self {
            id: ticket.id.to_string(),
            event_id: ticket.event_id.clone(),
            user_id: ticket.user_id.clone(),
            status: ticket.status,
        }
    }
}

/// Request to move a ticket along the status state machine.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TransitionTicketRequest {
    /// The requested edge
    pub action: TicketTransition,
}

/// List of tickets.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListTicketsResponse {
    /// Matching tickets
    pub tickets: Vec<TicketResponse>,
}

/// The ticket service RPC surface.
#[async_trait]
pub trait TicketApi: Send + Sync {
    /// Run the purchase saga: reserve stock atomically, create the ticket,
    /// fire a best-effort notification.
    async fn purchase_ticket(&self, req: PurchaseTicketRequest) -> Result<TicketResponse>;

    /// Fetch one ticket by its wire id; a malformed id is rejected before
    /// any lookup.
    async fn get_ticket(&self, id: &str) -> Result<TicketResponse>;

    /// Apply one status transition through the state machine.
    async fn transition_ticket(
        &self,
        id: &str,
        req: TransitionTicketRequest,
    ) -> Result<TicketResponse>;

    /// All tickets purchased by one user.
    async fn tickets_for_user(&self, user_id: &str) -> Result<ListTicketsResponse>;

    /// RESERVED and CONFIRMED tickets for one event (current demand).
    async fn active_tickets_for_event(&self, event_id: &str) -> Result<ListTicketsResponse>;
}
