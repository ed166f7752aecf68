//! Event store contract.
//!
//! One canonical contract per entity: the trait below is implemented by the
//! Postgres store used in production and by an in-memory store used by
//! tests and in-process wiring.

use crate::domain::{Event, EventId};
use async_trait::async_trait;
use platform_core::Result;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryEventStore;
pub use postgres::PostgresEventStore;

/// Persistence contract for event records and their stock counters.
///
/// All implementations must be safe for concurrent use; the only
/// concurrency-correctness mechanism the platform relies on is
/// [`decrement_stock`](EventStore::decrement_stock) being a single atomic
/// conditional update.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Persist a new event and return the stored record.
    async fn create(&self, event: Event) -> Result<Event>;

    /// Fetch an event by id; not-found when absent.
    async fn get(&self, id: EventId) -> Result<Event>;

    /// Overwrite an existing event row; not-found when absent.
    async fn update(&self, event: Event) -> Result<Event>;

    /// Delete an event; not-found when absent. Tickets referencing the
    /// event are untouched (weak reference, no cascade).
    async fn delete(&self, id: EventId) -> Result<()>;

    /// List events ordered by date, plus the total count.
    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Event>, i64)>;

    /// Read-only comparison of `quantity` against current stock.
    ///
    /// Returns `false` (not an error) when stock is insufficient;
    /// not-found only when the event does not exist.
    async fn check_availability(&self, id: EventId, quantity: i32) -> Result<bool>;

    /// Atomically decrease stock by `quantity` iff current stock suffices.
    ///
    /// Failure (resource-exhausted) signals either "event not found" or
    /// "insufficient stock"; the two are not distinguished by this
    /// operation alone. The conditional update is the sole arbiter under
    /// concurrent callers.
    async fn decrement_stock(&self, id: EventId, quantity: i32) -> Result<()>;

    /// Add stock back after a failed purchase step (saga compensation).
    async fn restore_stock(&self, id: EventId, quantity: i32) -> Result<()>;
}
