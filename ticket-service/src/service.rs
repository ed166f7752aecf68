//! Ticket service API, centered on the purchase saga.
//!
//! The purchase flow coordinates two stores it does not own (event stock,
//! notification log) plus its own ticket store, with no distributed
//! transaction. Stock reservation and ticket creation are tied together:
//! the orchestrator issues the event service's atomic decrement before
//! creating the ticket, and compensates by releasing the stock if the
//! ticket write fails afterwards. The notification step is best-effort and
//! never rolls anything back.

use crate::domain::{Ticket, TicketId};
use crate::notifier::{NotificationJob, Notifier};
use crate::rpc::{
    ListTicketsResponse, PurchaseTicketRequest, TicketApi, TicketResponse,
    TransitionTicketRequest,
};
use crate::store::TicketStore;
use async_trait::async_trait;
use event_service::rpc::EventApi;
use platform_core::{Error, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

/// In-process implementation of [`TicketApi`].
#[derive(Clone)]
pub struct TicketService {
    store: Arc<dyn TicketStore>,
    events: Arc<dyn EventApi>,
    notifier: Notifier,
}

impl TicketService {
    /// Create a service over the ticket store, the event service API and a
    /// notification dispatch handle.
    #[must_use]
    pub fn new(store: Arc<dyn TicketStore>, events: Arc<dyn EventApi>, notifier: Notifier) -> Self {
        Self {
            store,
            events,
            notifier,
        }
    }

    fn parse_id(id: &str) -> Result<TicketId> {
        if id.is_empty() {
            return Err(Error::invalid_argument("ticket id is required"));
        }
        TicketId::parse(id).map_err(|_| Error::invalid_argument("invalid ticket id format"))
    }

    /// Best-effort post-purchase notification: fetch the event name for a
    /// friendlier message, then hand the job to the bounded dispatch
    /// queue. Nothing here can fail the purchase.
    async fn notify_purchase(&self, ticket: &Ticket) {
        let message = match self.events.get_event(&ticket.event_id).await {
            Ok(event) => format!("Thank you for purchasing tickets to {}", event.name),
            Err(e) => {
                warn!(event_id = %ticket.event_id, error = %e, "failed to get event details");
                "Thank you for your ticket purchase".to_string()
            }
        };

        self.notifier.enqueue(NotificationJob {
            user_id: ticket.user_id.clone(),
            message,
        });
    }
}

#[async_trait]
impl TicketApi for TicketService {
    async fn purchase_ticket(&self, req: PurchaseTicketRequest) -> Result<TicketResponse> {
        if req.event_id.is_empty() {
            return Err(Error::invalid_argument("event id is required"));
        }
        if req.user_id.is_empty() {
            return Err(Error::invalid_argument("user id is required"));
        }
        if req.quantity <= 0 {
            return Err(Error::invalid_argument("quantity must be greater than 0"));
        }

        // Read-only pre-check for a precise user-facing error. The atomic
        // reservation below remains the sole arbiter under concurrency. Any
        // failure of the check itself, unknown event included, is an
        // internal error: the orchestrator answers only invalid-argument,
        // resource-exhausted or internal.
        let available = self
            .events
            .check_availability(&req.event_id, req.quantity)
            .await
            .map_err(|e| Error::internal("availability check failed").with_source(e))?;
        if !available {
            metrics::counter!("ticketing_purchases_total", "outcome" => "exhausted").increment(1);
            return Err(Error::resource_exhausted("not enough tickets available"));
        }

        // Take the stock before creating the ticket: two concurrent
        // purchasers can both pass the check above, but only one can win
        // the guarded decrement for the last tickets.
        self.events
            .reserve_stock(&req.event_id, req.quantity)
            .await
            .map_err(|e| {
                metrics::counter!("ticketing_purchases_total", "outcome" => "exhausted")
                    .increment(1);
                e
            })?;

        let ticket = Ticket::new(req.event_id.clone(), req.user_id.clone(), req.quantity);
        let ticket = match self.store.create(ticket).await {
            Ok(ticket) => ticket,
            Err(e) => {
                // Compensation: the stock was already taken, give it back.
                if let Err(release_err) = self
                    .events
                    .release_stock(&req.event_id, req.quantity)
                    .await
                {
                    error!(
                        event_id = %req.event_id,
                        quantity = req.quantity,
                        error = %release_err,
                        "failed to release stock after ticket creation failure"
                    );
                }
                metrics::counter!("ticketing_purchases_total", "outcome" => "failed").increment(1);
                return Err(e);
            }
        };

        self.notify_purchase(&ticket).await;

        metrics::counter!("ticketing_purchases_total", "outcome" => "success").increment(1);
        info!(
            ticket_id = %ticket.id,
            event_id = %ticket.event_id,
            user_id = %ticket.user_id,
            quantity = ticket.quantity,
            "ticket purchased"
        );

        Ok(TicketResponse::from(&ticket))
    }

    async fn get_ticket(&self, id: &str) -> Result<TicketResponse> {
        let id = Self::parse_id(id)?;
        let ticket = self.store.get(id).await?;
        Ok(TicketResponse::from(&ticket))
    }

    async fn transition_ticket(
        &self,
        id: &str,
        req: TransitionTicketRequest,
    ) -> Result<TicketResponse> {
        let id = Self::parse_id(id)?;
        let ticket = self.store.get(id).await?;

        // The state machine is the single authority on edges; the store
        // write is conditional on the status we read.
        let next = ticket.status.transition(req.action)?;
        let updated = self.store.update_status(id, ticket.status, next).await?;

        info!(ticket_id = %id, from = %ticket.status, to = %next, "ticket transitioned");
        Ok(TicketResponse::from(&updated))
    }

    async fn tickets_for_user(&self, user_id: &str) -> Result<ListTicketsResponse> {
        if user_id.is_empty() {
            return Err(Error::invalid_argument("user id is required"));
        }
        let tickets = self.store.get_by_user(user_id).await?;
        Ok(ListTicketsResponse {
            tickets: tickets.iter().map(TicketResponse::from).collect(),
        })
    }

    async fn active_tickets_for_event(&self, event_id: &str) -> Result<ListTicketsResponse> {
        if event_id.is_empty() {
            return Err(Error::invalid_argument("event id is required"));
        }
        let tickets = self.store.active_for_event(event_id).await?;
        Ok(ListTicketsResponse {
            tickets: tickets.iter().map(TicketResponse::from).collect(),
        })
    }
}
