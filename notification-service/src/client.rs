//! HTTP client for a remote notification service instance.

use crate::rpc::{
    ListNotificationsResponse, NotificationApi, NotificationResponse, SendNotificationRequest,
};
use async_trait::async_trait;
use platform_core::{
    Error, Result,
    http::{decode_json, transport_error},
};
use std::time::Duration;

/// Reqwest-backed implementation of [`NotificationApi`].
#[derive(Clone)]
pub struct HttpNotificationClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpNotificationClient {
    /// Create a client for the service at `base_url` with a per-request
    /// deadline.
    ///
    /// # Errors
    ///
    /// Returns an internal error when the underlying HTTP client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::internal("failed to build HTTP client").with_source(e))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl NotificationApi for HttpNotificationClient {
    async fn send_notification(
        &self,
        req: SendNotificationRequest,
    ) -> Result<NotificationResponse> {
        let response = self
            .http
            .post(self.url("/api/notifications"))
            .json(&req)
            .send()
            .await
            .map_err(|e| transport_error("send notification", e))?;
        decode_json(response, "send notification").await
    }

    async fn get_notifications(&self, user_id: &str) -> Result<ListNotificationsResponse> {
        let response = self
            .http
            .get(self.url(&format!("/api/users/{user_id}/notifications")))
            .send()
            .await
            .map_err(|e| transport_error("get notifications", e))?;
        decode_json(response, "get notifications").await
    }
}
