//! Notification service API over the store.

use crate::domain::Notification;
use crate::rpc::{
    ListNotificationsResponse, NotificationApi, NotificationResponse, SendNotificationRequest,
};
use crate::store::NotificationStore;
use async_trait::async_trait;
use platform_core::{Error, Result};
use std::sync::Arc;

/// In-process implementation of [`NotificationApi`].
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
}

impl NotificationService {
    /// Create a service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl NotificationApi for NotificationService {
    async fn send_notification(
        &self,
        req: SendNotificationRequest,
    ) -> Result<NotificationResponse> {
        if req.user_id.is_empty() {
            return Err(Error::invalid_argument("user id is required"));
        }
        if req.message.is_empty() {
            return Err(Error::invalid_argument("message is required"));
        }

        let notification = self
            .store
            .append(Notification::new(req.user_id, req.message))
            .await?;

        metrics::counter!("ticketing_notifications_sent_total").increment(1);
        tracing::info!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            "notification sent"
        );

        Ok(NotificationResponse::from(&notification))
    }

    async fn get_notifications(&self, user_id: &str) -> Result<ListNotificationsResponse> {
        if user_id.is_empty() {
            return Err(Error::invalid_argument("user id is required"));
        }

        let notifications = self.store.for_user(user_id).await?;
        Ok(ListNotificationsResponse {
            notifications: notifications.iter().map(NotificationResponse::from).collect(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::store::InMemoryNotificationStore;
    use platform_core::ErrorKind;

    fn service() -> NotificationService {
        NotificationService::new(Arc::new(InMemoryNotificationStore::new()))
    }

    #[tokio::test]
    async fn test_send_assigns_id_and_timestamp() {
        let service = service();
        let sent = service
            .send_notification(SendNotificationRequest {
                user_id: "user-1".to_string(),
                message: "Thank you for purchasing tickets to Rust Conf".to_string(),
            })
            .await
            .unwrap();

        assert!(!sent.id.is_empty());
        assert_eq!(sent.user_id, "user-1");

        let listed = service.get_notifications("user-1").await.unwrap();
        assert_eq!(listed.notifications, vec![sent]);
    }

    #[tokio::test]
    async fn test_send_rejects_empty_inputs() {
        let service = service();

        let err = service
            .send_notification(SendNotificationRequest {
                user_id: String::new(),
                message: "hello".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = service
            .send_notification(SendNotificationRequest {
                user_id: "user-1".to_string(),
                message: String::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_get_requires_user_id() {
        let service = service();
        let err = service.get_notifications("").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
