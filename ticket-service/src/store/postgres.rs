//! Postgres-backed ticket store.

use super::TicketStore;
use crate::domain::{Ticket, TicketId, TicketStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use platform_core::{Error, Result, error::from_sqlx};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

type TicketRow = (
    Uuid,
    String,
    String,
    String,
    i32,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn ticket_from_row(row: TicketRow) -> Result<Ticket> {
    let (id, event_id, user_id, status, quantity, created_at, updated_at) = row;
    // A status outside the enum means the row was corrupted, not bad input.
    let status = TicketStatus::parse(&status)
        .map_err(|_| Error::internal(format!("ticket {id} has unknown status {status}")))?;
    Ok(Ticket {
        id: TicketId::from_uuid(id),
        event_id,
        user_id,
        status,
        quantity,
        created_at,
        updated_at,
    })
}

/// Postgres implementation of [`TicketStore`].
#[derive(Clone)]
pub struct PostgresTicketStore {
    pool: Arc<PgPool>,
}

impl PostgresTicketStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

const SELECT_TICKET: &str =
    "SELECT id, event_id, user_id, status, quantity, created_at, updated_at FROM tickets";

#[async_trait]
impl TicketStore for PostgresTicketStore {
    async fn create(&self, ticket: Ticket) -> Result<Ticket> {
        sqlx::query(
            "INSERT INTO tickets (id, event_id, user_id, status, quantity, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(ticket.id.as_uuid())
        .bind(&ticket.event_id)
        .bind(&ticket.user_id)
        .bind(ticket.status.as_str())
        .bind(ticket.quantity)
        .bind(ticket.created_at)
        .bind(ticket.updated_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| from_sqlx("ticket", e))?;

        Ok(ticket)
    }

    async fn get(&self, id: TicketId) -> Result<Ticket> {
        let row: Option<TicketRow> = sqlx::query_as(&format!("{SELECT_TICKET} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(|e| from_sqlx("ticket", e))?;

        match row {
            Some(row) => ticket_from_row(row),
            None => Err(Error::not_found("ticket", id)),
        }
    }

    async fn get_by_user(&self, user_id: &str) -> Result<Vec<Ticket>> {
        let rows: Vec<TicketRow> = sqlx::query_as(&format!(
            "{SELECT_TICKET} WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(|e| from_sqlx("ticket", e))?;

        rows.into_iter().map(ticket_from_row).collect()
    }

    async fn update_status(
        &self,
        id: TicketId,
        expected: TicketStatus,
        next: TicketStatus,
    ) -> Result<Ticket> {
        let row: Option<TicketRow> = sqlx::query_as(
            "UPDATE tickets SET status = $1, updated_at = NOW()
             WHERE id = $2 AND status = $3
             RETURNING id, event_id, user_id, status, quantity, created_at, updated_at",
        )
        .bind(next.as_str())
        .bind(id.as_uuid())
        .bind(expected.as_str())
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(|e| from_sqlx("ticket", e))?;

        match row {
            Some(row) => ticket_from_row(row),
            None => {
                // Distinguish a missing ticket from a lost status race.
                let current = self.get(id).await?;
                Err(Error::invalid_argument(format!(
                    "ticket {id} is no longer {expected} (now {})",
                    current.status
                )))
            }
        }
    }

    async fn active_for_event(&self, event_id: &str) -> Result<Vec<Ticket>> {
        let rows: Vec<TicketRow> = sqlx::query_as(&format!(
            "{SELECT_TICKET} WHERE event_id = $1 AND status IN ($2, $3)"
        ))
        .bind(event_id)
        .bind(TicketStatus::Reserved.as_str())
        .bind(TicketStatus::Confirmed.as_str())
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(|e| from_sqlx("ticket", e))?;

        rows.into_iter().map(ticket_from_row).collect()
    }
}
