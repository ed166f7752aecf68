//! Postgres-backed event store.
//!
//! The stock decrement is a single `UPDATE ... WHERE ticket_stock >= $n`
//! statement, relying on the database's atomicity for one write to
//! linearize concurrent decrements against the same row.

use super::EventStore;
use crate::domain::{Event, EventId};
use async_trait::async_trait;
use platform_core::{Error, Result, error::from_sqlx};
use sqlx::PgPool;
use std::sync::Arc;

/// Postgres implementation of [`EventStore`].
#[derive(Clone)]
pub struct PostgresEventStore {
    pool: Arc<PgPool>,
}

impl PostgresEventStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Access the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        self.pool.as_ref()
    }
}

#[async_trait]
impl EventStore for PostgresEventStore {
    async fn create(&self, event: Event) -> Result<Event> {
        sqlx::query(
            "INSERT INTO events (id, name, date, location, ticket_stock)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(event.id.as_uuid())
        .bind(&event.name)
        .bind(event.date)
        .bind(&event.location)
        .bind(event.ticket_stock)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| from_sqlx("event", e))?;

        // Re-read so the caller sees the store-assigned timestamps.
        self.get(event.id).await
    }

    async fn get(&self, id: EventId) -> Result<Event> {
        let event: Option<Event> = sqlx::query_as(
            "SELECT id, name, date, location, ticket_stock, created_at, updated_at
             FROM events WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| from_sqlx("event", e))?;

        event.ok_or_else(|| Error::not_found("event", id))
    }

    async fn update(&self, event: Event) -> Result<Event> {
        let result = sqlx::query(
            "UPDATE events
             SET name = $1, date = $2, location = $3, ticket_stock = $4, updated_at = NOW()
             WHERE id = $5",
        )
        .bind(&event.name)
        .bind(event.date)
        .bind(&event.location)
        .bind(event.ticket_stock)
        .bind(event.id.as_uuid())
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| from_sqlx("event", e))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("event", event.id));
        }

        self.get(event.id).await
    }

    async fn delete(&self, id: EventId) -> Result<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool.as_ref())
            .await
            .map_err(|e| from_sqlx("event", e))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("event", id));
        }

        Ok(())
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Event>, i64)> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(|e| from_sqlx("event", e))?;

        let events: Vec<Event> = sqlx::query_as(
            "SELECT id, name, date, location, ticket_stock, created_at, updated_at
             FROM events ORDER BY date ASC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(|e| from_sqlx("event", e))?;

        Ok((events, total))
    }

    async fn check_availability(&self, id: EventId, quantity: i32) -> Result<bool> {
        if quantity <= 0 {
            return Err(Error::invalid_argument("quantity must be greater than 0"));
        }

        let stock: Option<(i32,)> = sqlx::query_as("SELECT ticket_stock FROM events WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(|e| from_sqlx("event", e))?;

        match stock {
            Some((ticket_stock,)) => Ok(ticket_stock >= quantity),
            None => Err(Error::not_found("event", id)),
        }
    }

    async fn decrement_stock(&self, id: EventId, quantity: i32) -> Result<()> {
        if quantity <= 0 {
            return Err(Error::invalid_argument("quantity must be greater than 0"));
        }

        let result = sqlx::query(
            "UPDATE events
             SET ticket_stock = ticket_stock - $1, updated_at = NOW()
             WHERE id = $2 AND ticket_stock >= $1",
        )
        .bind(quantity)
        .bind(id.as_uuid())
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| from_sqlx("event", e))?;

        // Zero rows means either an unknown event or insufficient stock;
        // the guard does not distinguish the two.
        if result.rows_affected() == 0 {
            return Err(Error::resource_exhausted("not enough tickets available"));
        }

        Ok(())
    }

    async fn restore_stock(&self, id: EventId, quantity: i32) -> Result<()> {
        if quantity <= 0 {
            return Err(Error::invalid_argument("quantity must be greater than 0"));
        }

        let result = sqlx::query(
            "UPDATE events
             SET ticket_stock = ticket_stock + $1, updated_at = NOW()
             WHERE id = $2",
        )
        .bind(quantity)
        .bind(id.as_uuid())
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| from_sqlx("event", e))?;

        if result.rows_affected() == 0 {
            return Err(Error::not_found("event", id));
        }

        Ok(())
    }
}
