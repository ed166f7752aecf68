//! Domain types for tickets, including the status state machine.

use chrono::{DateTime, Utc};
use platform_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a ticket, generated by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct TicketId(Uuid);

impl TicketId {
    /// Creates a new random `TicketId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `TicketId` from a `Uuid`.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a `TicketId` from its wire representation.
    ///
    /// # Errors
    ///
    /// Returns `Err` when the string is not a valid UUID.
    pub fn parse(s: &str) -> std::result::Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }

    /// Get the inner UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TicketId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a ticket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Created at purchase time, pending confirmation
    Reserved,
    /// Confirmed by the user
    Confirmed,
    /// Cancelled before use
    Cancelled,
    /// Redeemed at the venue
    Used,
}

impl TicketStatus {
    /// Wire representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reserved => "RESERVED",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Used => "USED",
        }
    }

    /// Parse a status from its wire representation.
    ///
    /// # Errors
    ///
    /// Invalid-argument when the string names no known status.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "RESERVED" => Ok(Self::Reserved),
            "CONFIRMED" => Ok(Self::Confirmed),
            "CANCELLED" => Ok(Self::Cancelled),
            "USED" => Ok(Self::Used),
            other => Err(Error::invalid_argument(format!(
                "unknown ticket status: {other}"
            ))),
        }
    }

    /// Apply one transition, rejecting edges outside the table
    /// `RESERVED -> CONFIRMED | CANCELLED`, `CONFIRMED -> USED | CANCELLED`.
    ///
    /// # Errors
    ///
    /// Invalid-argument for any edge not in the table.
    pub fn transition(self, transition: TicketTransition) -> Result<Self> {
        match (self, transition) {
            (Self::Reserved, TicketTransition::Confirm) => Ok(Self::Confirmed),
            (Self::Reserved | Self::Confirmed, TicketTransition::Cancel) => Ok(Self::Cancelled),
            (Self::Confirmed, TicketTransition::Use) => Ok(Self::Used),
            (state, transition) => Err(Error::invalid_argument(format!(
                "cannot {} a {} ticket",
                transition.as_str(),
                state.as_str()
            ))),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested edge in the ticket status state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketTransition {
    /// Reserved ticket confirmed by the user
    Confirm,
    /// Reserved or confirmed ticket cancelled
    Cancel,
    /// Confirmed ticket redeemed
    Use,
}

impl TicketTransition {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
            Self::Use => "use",
        }
    }
}

/// A purchased block of tickets for one event and one user.
#[derive(Clone, Debug, PartialEq)]
pub struct Ticket {
    /// Ticket identifier
    pub id: TicketId,
    /// Weak reference to the event (opaque id, no integrity enforced)
    pub event_id: String,
    /// Purchasing user
    pub user_id: String,
    /// Lifecycle state
    pub status: TicketStatus,
    /// Number of tickets in the block
    pub quantity: i32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Build a new reserved ticket with a fresh identifier.
    #[must_use]
    pub fn new(event_id: String, user_id: String, quantity: i32) -> Self {
        let now = Utc::now();
        Self {
            id: TicketId::new(),
            event_id,
            user_id,
            status: TicketStatus::Reserved,
            quantity,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use platform_core::ErrorKind;

    #[test]
    fn test_new_ticket_starts_reserved() {
        let ticket = Ticket::new("event-1".to_string(), "user-1".to_string(), 2);
        assert_eq!(ticket.status, TicketStatus::Reserved);
        assert_eq!(ticket.quantity, 2);
    }

    #[test]
    fn test_valid_transitions() {
        use TicketStatus::{Cancelled, Confirmed, Reserved, Used};
        use TicketTransition::{Cancel, Confirm, Use};

        assert_eq!(Reserved.transition(Confirm).unwrap(), Confirmed);
        assert_eq!(Reserved.transition(Cancel).unwrap(), Cancelled);
        assert_eq!(Confirmed.transition(Use).unwrap(), Used);
        assert_eq!(Confirmed.transition(Cancel).unwrap(), Cancelled);
    }

    #[test]
    fn test_invalid_edges_are_rejected() {
        use TicketStatus::{Cancelled, Reserved, Used};
        use TicketTransition::{Cancel, Confirm, Use};

        for (state, transition) in [
            (Reserved, Use),
            (Cancelled, Confirm),
            (Cancelled, Cancel),
            (Cancelled, Use),
            (Used, Confirm),
            (Used, Cancel),
            (Used, Use),
        ] {
            let err = state.transition(transition).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{state} {transition:?}");
        }
    }

    #[test]
    fn test_status_round_trips_through_wire_form() {
        for status in [
            TicketStatus::Reserved,
            TicketStatus::Confirmed,
            TicketStatus::Cancelled,
            TicketStatus::Used,
        ] {
            assert_eq!(TicketStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(TicketStatus::parse("EATEN").is_err());
    }
}
