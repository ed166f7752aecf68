//! Domain types for the event catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an event.
///
/// Opaque string on the wire, UUID internally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random `EventId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `EventId` from a `Uuid`.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an `EventId` from its wire representation.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the string is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }

    /// Get the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event in the catalog.
///
/// Invariant: `ticket_stock >= 0` at all times; the counter is decremented
/// only through [`crate::store::EventStore::decrement_stock`].
#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Event {
    /// Event identifier
    pub id: EventId,
    /// Event name
    pub name: String,
    /// Scheduled date
    pub date: DateTime<Utc>,
    /// Venue
    pub location: String,
    /// Remaining unsold tickets
    pub ticket_stock: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Build a new event with a fresh identifier and current timestamps.
    #[must_use]
    pub fn new(name: String, date: DateTime<Utc>, location: String, ticket_stock: i32) -> Self {
        let now = Utc::now();
        Self {
            id: EventId::new(),
            name,
            date,
            location,
            ticket_stock,
            created_at: now,
            updated_at: now,
        }
    }
}
