//! HTTP client for a remote event service instance.
//!
//! Implements [`EventApi`] against the gateway in [`crate::api`], so the
//! ticket service's orchestrator can stay agnostic of whether the event
//! service is in-process or across the network. Every request carries the
//! client's bounded timeout; dropping the future cancels in-flight work.

use crate::rpc::{
    AvailabilityResponse, CreateEventRequest, EventApi, EventResponse, ListEventsResponse,
    StockRequest, UpdateEventRequest,
};
use async_trait::async_trait;
use platform_core::{
    Error, PageRequest, Result,
    http::{decode_empty, decode_json, transport_error},
};
use std::time::Duration;

/// Reqwest-backed implementation of [`EventApi`].
#[derive(Clone)]
pub struct HttpEventClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpEventClient {
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
impl EventApi for HttpEventClient {
    async fn create_event(&self, req: CreateEventRequest) -> Result<EventResponse> {
        let response = self
            .http
            .post(self.url("/api/events"))
            .json(&req)
            .send()
            .await
            .map_err(|e| transport_error("create event", e))?;
        decode_json(response, "create event").await
    }

    async fn get_event(&self, id: &str) -> Result<EventResponse> {
        let response = self
            .http
            .get(self.url(&format!("/api/events/{id}")))
            .send()
            .await
            .map_err(|e| transport_error("get event", e))?;
        decode_json(response, "get event").await
    }

    async fn update_event(&self, id: &str, req: UpdateEventRequest) -> Result<EventResponse> {
        let response = self
            .http
            .put(self.url(&format!("/api/events/{id}")))
            .json(&req)
            .send()
            .await
            .map_err(|e| transport_error("update event", e))?;
        decode_json(response, "update event").await
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!("/api/events/{id}")))
            .send()
            .await
            .map_err(|e| transport_error("delete event", e))?;
        decode_empty(response, "delete event").await
    }

    async fn list_events(&self, page: PageRequest) -> Result<ListEventsResponse> {
        let response = self
            .http
            .get(self.url("/api/events"))
            .query(&[("page", page.page), ("page_size", page.page_size)])
            .send()
            .await
            .map_err(|e| transport_error("list events", e))?;
        decode_json(response, "list events").await
    }

    async fn check_availability(&self, event_id: &str, quantity: i32) -> Result<bool> {
        let response = self
            .http
            .get(self.url(&format!("/api/events/{event_id}/availability")))
            .query(&[("quantity", quantity)])
            .send()
            .await
            .map_err(|e| transport_error("check availability", e))?;
        let body: AvailabilityResponse = decode_json(response, "check availability").await?;
        Ok(body.available)
    }

    async fn reserve_stock(&self, event_id: &str, quantity: i32) -> Result<()> {
        let response = self
            .http
            .post(self.url(&format!("/api/events/{event_id}/stock/reserve")))
            .json(&StockRequest { quantity })
            .send()
            .await
            .map_err(|e| transport_error("reserve stock", e))?;
        decode_empty(response, "reserve stock").await
    }

    async fn release_stock(&self, event_id: &str, quantity: i32) -> Result<()> {
        let response = self
            .http
            .post(self.url(&format!("/api/events/{event_id}/stock/release")))
            .json(&StockRequest { quantity })
            .send()
            .await
            .map_err(|e| transport_error("release stock", e))?;
        decode_empty(response, "release stock").await
    }
}
