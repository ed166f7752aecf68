//! Domain types for the notification log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
    /// Creates a new random `NotificationId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message sent to one user. Append-only.
#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Notification {
    /// Notification identifier
    pub id: NotificationId,
    /// Recipient
    pub user_id: String,
    /// Free-text message
    pub message: String,
    /// When the notification was recorded
    pub sent_at: DateTime<Utc>,
}

impl Notification {
    /// Build a new notification stamped with the current time.
    #[must_use]
    pub fn new(user_id: String, message: String) -> Self {
        Self {
            id: NotificationId::new(),
            user_id,
            message,
            sent_at: Utc::now(),
        }
    }
}
