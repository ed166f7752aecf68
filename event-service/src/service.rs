//! Event service API: validation and business rules in front of the store.
//!
//! Validation errors are produced here and never reach the store; store
//! errors pass through with their classification intact.

use crate::domain::{Event, EventId};
use crate::rpc::{
    CreateEventRequest, EventApi, EventResponse, ListEventsResponse, UpdateEventRequest,
};
use crate::store::EventStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use platform_core::{Error, PageRequest, Result};
use std::sync::Arc;

/// In-process implementation of [`EventApi`] over an [`EventStore`].
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn EventStore>,
}

impl EventService {
    /// Create a service over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    fn parse_id(id: &str) -> Result<EventId> {
        if id.is_empty() {
            return Err(Error::invalid_argument("event id is required"));
        }
        EventId::parse(id).map_err(|_| Error::invalid_argument("invalid event id format"))
    }

    fn parse_date(date: &str) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(date)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|_| Error::invalid_argument("date must be a valid RFC 3339 timestamp"))
    }
}

#[async_trait]
impl EventApi for EventService {
    async fn create_event(&self, req: CreateEventRequest) -> Result<EventResponse> {
        if req.name.is_empty() {
            return Err(Error::invalid_argument("name is required"));
        }
        if req.location.is_empty() {
            return Err(Error::invalid_argument("location is required"));
        }
        if req.date.is_empty() {
            return Err(Error::invalid_argument("date is required"));
        }
        if req.ticket_stock <= 0 {
            return Err(Error::invalid_argument(
                "ticket stock must be greater than 0",
            ));
        }

        let date = Self::parse_date(&req.date)?;
        let event = Event::new(req.name, date, req.location, req.ticket_stock);

        let created = self.store.create(event).await?;
        metrics::counter!("ticketing_events_created_total").increment(1);
        tracing::info!(event_id = %created.id, name = %created.name, "event created");

        Ok(EventResponse::from(&created))
    }

    async fn get_event(&self, id: &str) -> Result<EventResponse> {
        let id = Self::parse_id(id)?;
        let event = self.store.get(id).await?;
        Ok(EventResponse::from(&event))
    }

    async fn update_event(&self, id: &str, req: UpdateEventRequest) -> Result<EventResponse> {
        let id = Self::parse_id(id)?;
        let mut event = self.store.get(id).await?;

        if let Some(name) = req.name.filter(|n| !n.is_empty()) {
            event.name = name;
        }
        if let Some(location) = req.location.filter(|l| !l.is_empty()) {
            event.location = location;
        }
        if let Some(date) = req.date.filter(|d| !d.is_empty()) {
            // An unparsable date aborts the whole update; nothing above has
            // been written yet.
            event.date = Self::parse_date(&date)?;
        }
        if let Some(stock) = req.ticket_stock.filter(|s| *s > 0) {
            event.ticket_stock = stock;
        }

        let updated = self.store.update(event).await?;
        tracing::info!(event_id = %updated.id, "event updated");

        Ok(EventResponse::from(&updated))
    }

    async fn delete_event(&self, id: &str) -> Result<()> {
        let id = Self::parse_id(id)?;
        self.store.delete(id).await?;
        tracing::info!(event_id = %id, "event deleted");
        Ok(())
    }

    async fn list_events(&self, page: PageRequest) -> Result<ListEventsResponse> {
        let (_, page_size) = page.normalized();
        let (events, total) = self
            .store
            .list(i64::from(page_size), page.offset())
            .await?;

        Ok(ListEventsResponse {
            events: events.iter().map(EventResponse::from).collect(),
            total,
        })
    }

    async fn check_availability(&self, event_id: &str, quantity: i32) -> Result<bool> {
        let id = Self::parse_id(event_id)?;
        if quantity <= 0 {
            return Err(Error::invalid_argument("quantity must be greater than 0"));
        }
        self.store.check_availability(id, quantity).await
    }

    async fn reserve_stock(&self, event_id: &str, quantity: i32) -> Result<()> {
        let id = Self::parse_id(event_id)?;
        if quantity <= 0 {
            return Err(Error::invalid_argument("quantity must be greater than 0"));
        }
        self.store.decrement_stock(id, quantity).await?;
        tracing::info!(event_id = %id, quantity, "stock reserved");
        Ok(())
    }

    async fn release_stock(&self, event_id: &str, quantity: i32) -> Result<()> {
        let id = Self::parse_id(event_id)?;
        if quantity <= 0 {
            return Err(Error::invalid_argument("quantity must be greater than 0"));
        }
        self.store.restore_stock(id, quantity).await?;
        tracing::warn!(event_id = %id, quantity, "stock released back");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use crate::store::InMemoryEventStore;
    use platform_core::ErrorKind;

    fn service() -> EventService {
        EventService::new(Arc::new(InMemoryEventStore::new()))
    }

    fn create_request(stock: i32) -> CreateEventRequest {
        CreateEventRequest {
            name: "Rust Conf".to_string(),
            date: "2026-09-01T19:00:00Z".to_string(),
            location: "Berlin".to_string(),
            ticket_stock: stock,
        }
    }

    #[tokio::test]
    async fn test_create_returns_requested_fields_and_get_matches() {
        let service = service();
        let created = service.create_event(create_request(100)).await.unwrap();

        assert_eq!(created.name, "Rust Conf");
        assert_eq!(created.location, "Berlin");
        assert_eq!(created.ticket_stock, 100);
        assert_eq!(created.date.to_rfc3339(), "2026-09-01T19:00:00+00:00");

        let fetched = service.get_event(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_fields_naming_them() {
        let service = service();

        let mut req = create_request(10);
        req.name = String::new();
        let err = service.create_event(req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.message().contains("name"));

        let mut req = create_request(10);
        req.location = String::new();
        let err = service.create_event(req).await.unwrap_err();
        assert!(err.message().contains("location"));

        let mut req = create_request(10);
        req.date = String::new();
        let err = service.create_event(req).await.unwrap_err();
        assert!(err.message().contains("date"));
    }

    #[tokio::test]
    async fn test_create_rejects_non_positive_stock() {
        let service = service();
        let err = service.create_event(create_request(0)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_create_rejects_unparsable_date() {
        let service = service();
        let mut req = create_request(10);
        req.date = "next tuesday".to_string();
        let err = service.create_event(req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.message().contains("date"));
    }

    #[tokio::test]
    async fn test_get_rejects_malformed_id_before_lookup() {
        let service = service();
        let err = service.get_event("not-a-uuid").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = service.get_event("").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_update_applies_only_provided_fields() {
        let service = service();
        let created = service.create_event(create_request(50)).await.unwrap();

        let updated = service
            .update_event(
                &created.id,
                UpdateEventRequest {
                    location: Some("Munich".to_string()),
                    ..UpdateEventRequest::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.location, "Munich");
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.date, created.date);
        assert_eq!(updated.ticket_stock, created.ticket_stock);
    }

    #[tokio::test]
    async fn test_update_with_bad_date_aborts_whole_update() {
        let service = service();
        let created = service.create_event(create_request(50)).await.unwrap();

        let err = service
            .update_event(
                &created.id,
                UpdateEventRequest {
                    name: Some("Renamed".to_string()),
                    date: Some("garbage".to_string()),
                    ..UpdateEventRequest::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        // No partial apply: the name change was discarded too.
        let fetched = service.get_event(&created.id).await.unwrap();
        assert_eq!(fetched.name, "Rust Conf");
    }

    #[tokio::test]
    async fn test_update_ignores_non_positive_stock() {
        let service = service();
        let created = service.create_event(create_request(50)).await.unwrap();

        let updated = service
            .update_event(
                &created.id,
                UpdateEventRequest {
                    ticket_stock: Some(0),
                    ..UpdateEventRequest::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.ticket_stock, 50);
    }

    #[tokio::test]
    async fn test_delete_missing_event_is_not_found() {
        let service = service();
        let err = service
            .delete_event(&EventId::new().to_string())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_clamps_pagination() {
        let service = service();
        for _ in 0..12 {
            service.create_event(create_request(5)).await.unwrap();
        }

        // page=0/page_size=0 behaves as page=1/page_size=10.
        let listed = service
            .list_events(PageRequest { page: 0, page_size: 0 })
            .await
            .unwrap();
        assert_eq!(listed.events.len(), 10);
        assert_eq!(listed.total, 12);
    }

    #[tokio::test]
    async fn test_availability_tracks_reserved_stock() {
        let service = service();
        let created = service.create_event(create_request(100)).await.unwrap();

        assert!(service.check_availability(&created.id, 50).await.unwrap());
        service.reserve_stock(&created.id, 50).await.unwrap();
        assert!(!service.check_availability(&created.id, 60).await.unwrap());
        assert!(service.check_availability(&created.id, 50).await.unwrap());
    }

    #[tokio::test]
    async fn test_reserve_more_than_stock_is_resource_exhausted() {
        let service = service();
        let created = service.create_event(create_request(10)).await.unwrap();

        let err = service.reserve_stock(&created.id, 11).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
    }
}
