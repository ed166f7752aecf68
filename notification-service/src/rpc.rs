//! Notification service API contract and wire types.

use crate::domain::Notification;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use platform_core::Result;
use serde::{Deserialize, Serialize};

/// Request to send a notification to a user.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SendNotificationRequest {
    /// Recipient
    pub user_id: String,
    /// Free-text message
    pub message: String,
}

/// External view of a notification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotificationResponse {
    /// Notification identifier
    pub id: String,
    /// Recipient
    pub user_id: String,
    /// Free-text message
    pub message: String,
    /// When the notification was recorded
    pub sent_at: DateTime<Utc>,
}

impl From<&Notification> for NotificationResponse {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            user_id: notification.user_id.clone(),
            message: notification.message.clone(),
            sent_at: notification.sent_at,
        }
    }
}

/// List of notifications for one user.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListNotificationsResponse {
    /// Notifications, newest first
    pub notifications: Vec<NotificationResponse>,
}

/// The notification service RPC surface.
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// Record and deliver a notification.
    async fn send_notification(&self, req: SendNotificationRequest)
    -> Result<NotificationResponse>;

    /// All notifications for one user, newest first.
    async fn get_notifications(&self, user_id: &str) -> Result<ListNotificationsResponse>;
}
