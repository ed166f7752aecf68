//! Postgres-backed notification store.

use super::NotificationStore;
use crate::domain::Notification;
use async_trait::async_trait;
use platform_core::{Result, error::from_sqlx};
use sqlx::PgPool;
use std::sync::Arc;

/// Postgres implementation of [`NotificationStore`].
#[derive(Clone)]
pub struct PostgresNotificationStore {
    pool: Arc<PgPool>,
}

impl PostgresNotificationStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PostgresNotificationStore {
    async fn append(&self, notification: Notification) -> Result<Notification> {
        sqlx::query(
            "INSERT INTO notifications (id, user_id, message, sent_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(notification.id)
        .bind(&notification.user_id)
        .bind(&notification.message)
        .bind(notification.sent_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| from_sqlx("notification", e))?;

        Ok(notification)
    }

    async fn for_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        let notifications: Vec<Notification> = sqlx::query_as(
            "SELECT id, user_id, message, sent_at
             FROM notifications WHERE user_id = $1 ORDER BY sent_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(|e| from_sqlx("notification", e))?;

        Ok(notifications)
    }
}
