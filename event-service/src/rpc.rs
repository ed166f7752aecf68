//! Event service API contract and wire types.
//!
//! [`EventApi`] is the RPC surface other services program against. It is
//! implemented in-process by [`crate::service::EventService`] and remotely
//! by [`crate::client::HttpEventClient`]; callers depend only on the trait.

use crate::domain::Event;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use platform_core::{PageRequest, Result};
use serde::{Deserialize, Serialize};

/// Request to create a new event.
///
/// The date travels as a string: it must parse as RFC 3339 and a parse
/// failure is an invalid-argument error naming the field, produced before
/// any store access.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateEventRequest {
    /// Event name
    pub name: String,
    /// Scheduled date, RFC 3339
    pub date: String,
    /// Venue
    pub location: String,
    /// Initial number of tickets for sale
    pub ticket_stock: i32,
}

/// Partial update of an event.
///
/// Only provided fields overwrite existing values (partial-update-by-
/// presence, not a full replace).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    /// New name, when present
    pub name: Option<String>,
    /// New date (RFC 3339), when present
    pub date: Option<String>,
    /// New venue, when present
    pub location: Option<String>,
    /// New stock, when present and positive
    pub ticket_stock: Option<i32>,
}

/// External view of an event. Timestamps are not exposed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventResponse {
    /// Event identifier
    pub id: String,
    /// Event name
    pub name: String,
    /// Scheduled date
    pub date: DateTime<Utc>,
    /// Venue
    pub location: String,
    /// Remaining unsold tickets
    pub ticket_stock: i32,
}

impl From<&Event> for EventResponse {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.to_string(),
            name: event.name.clone(),
            date: event.date,
            location: event.location.clone(),
            ticket_stock: event.ticket_stock,
        }
    }
}

/// A page of events plus the total catalog size.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListEventsResponse {
    /// Events on this page, ordered by date
    pub events: Vec<EventResponse>,
    /// Total number of events in the catalog
    pub total: i64,
}

/// Availability query result.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// Whether the requested quantity is currently in stock
    pub available: bool,
}

/// Stock reservation/release request body.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StockRequest {
    /// Number of tickets
    pub quantity: i32,
}

/// The event service RPC surface.
#[async_trait]
pub trait EventApi: Send + Sync {
    /// Create an event after validating every field.
    async fn create_event(&self, req: CreateEventRequest) -> Result<EventResponse>;

    /// Fetch one event by its wire id.
    async fn get_event(&self, id: &str) -> Result<EventResponse>;

    /// Partially update an event; an unparsable date aborts the whole
    /// update with no partial apply.
    async fn update_event(&self, id: &str, req: UpdateEventRequest) -> Result<EventResponse>;

    /// Delete an event; not-found when absent, never a silent success.
    async fn delete_event(&self, id: &str) -> Result<()>;

    /// List events; out-of-range pagination values are clamped, not
    /// rejected.
    async fn list_events(&self, page: PageRequest) -> Result<ListEventsResponse>;

    /// Read-only availability check: `available == (quantity <= stock)`.
    async fn check_availability(&self, event_id: &str, quantity: i32) -> Result<bool>;

    /// Atomically take `quantity` tickets out of stock; resource-exhausted
    /// when the guarded decrement matches no row.
    async fn reserve_stock(&self, event_id: &str, quantity: i32) -> Result<()>;

    /// Return previously reserved tickets to stock (saga compensation).
    async fn release_stock(&self, event_id: &str, quantity: i32) -> Result<()>;
}
