//! In-memory notification store for tests and in-process wiring.

use super::NotificationStore;
use crate::domain::Notification;
use async_trait::async_trait;
use platform_core::Result;
use tokio::sync::RwLock;

/// In-memory implementation of [`NotificationStore`].
#[derive(Default)]
pub struct InMemoryNotificationStore {
    notifications: RwLock<Vec<Notification>>,
}

impl InMemoryNotificationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn append(&self, notification: Notification) -> Result<Notification> {
        let mut notifications = self.notifications.write().await;
        notifications.push(notification.clone());
        Ok(notification)
    }

    async fn for_user(&self, user_id: &str) -> Result<Vec<Notification>> {
        let notifications = self.notifications.read().await;
        let mut matching: Vec<Notification> = notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        Ok(matching)
    }
}
