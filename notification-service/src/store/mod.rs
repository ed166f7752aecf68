//! Notification store contract.

use crate::domain::Notification;
use async_trait::async_trait;
use platform_core::Result;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryNotificationStore;
pub use postgres::PostgresNotificationStore;

/// Persistence contract for the append-only notification log.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Append a notification to the log.
    async fn append(&self, notification: Notification) -> Result<Notification>;

    /// All notifications for one user, newest first.
    async fn for_user(&self, user_id: &str) -> Result<Vec<Notification>>;
}
