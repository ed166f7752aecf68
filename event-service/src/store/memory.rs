//! In-memory event store.
//!
//! Backs unit tests and in-process wiring. The write lock makes the
//! check-and-decrement indivisible, matching the contract the Postgres
//! store gets from its conditional `UPDATE`.

use super::EventStore;
use crate::domain::{Event, EventId};
use async_trait::async_trait;
use chrono::Utc;
use platform_core::{Error, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory implementation of [`EventStore`].
#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<HashMap<EventId, Event>>,
}

impl InMemoryEventStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn create(&self, mut event: Event) -> Result<Event> {
        // The store owns the timestamps, same as the database defaults in
        // the Postgres implementation.
        let now = Utc::now();
        event.created_at = now;
        event.updated_at = now;

        let mut events = self.events.write().await;
        events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn get(&self, id: EventId) -> Result<Event> {
        let events = self.events.read().await;
        events
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::not_found("event", id))
    }

    async fn update(&self, mut event: Event) -> Result<Event> {
        let mut events = self.events.write().await;
        if !events.contains_key(&event.id) {
            return Err(Error::not_found("event", event.id));
        }
        event.updated_at = Utc::now();
        events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn delete(&self, id: EventId) -> Result<()> {
        let mut events = self.events.write().await;
        events
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found("event", id))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Event>, i64)> {
        let events = self.events.read().await;
        let total = events.len() as i64;

        let mut all: Vec<Event> = events.values().cloned().collect();
        all.sort_by_key(|e| e.date);

        let page = all
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .collect();

        Ok((page, total))
    }

    async fn check_availability(&self, id: EventId, quantity: i32) -> Result<bool> {
        if quantity <= 0 {
            return Err(Error::invalid_argument("quantity must be greater than 0"));
        }

        let events = self.events.read().await;
        events
            .get(&id)
            .map(|e| e.ticket_stock >= quantity)
            .ok_or_else(|| Error::not_found("event", id))
    }

    async fn decrement_stock(&self, id: EventId, quantity: i32) -> Result<()> {
        if quantity <= 0 {
            return Err(Error::invalid_argument("quantity must be greater than 0"));
        }

        // Check and decrement under one write lock: no interleaving caller
        // can observe the stock between the comparison and the write.
        let mut events = self.events.write().await;
        match events.get_mut(&id) {
            Some(event) if event.ticket_stock >= quantity => {
                event.ticket_stock -= quantity;
                event.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(Error::resource_exhausted("not enough tickets available")),
        }
    }

    async fn restore_stock(&self, id: EventId, quantity: i32) -> Result<()> {
        if quantity <= 0 {
            return Err(Error::invalid_argument("quantity must be greater than 0"));
        }

        let mut events = self.events.write().await;
        match events.get_mut(&id) {
            Some(event) => {
                event.ticket_stock += quantity;
                event.updated_at = Utc::now();
                Ok(())
            }
            None => Err(Error::not_found("event", id)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use chrono::Utc;
    use platform_core::ErrorKind;
    use std::sync::Arc;

    fn sample_event(stock: i32) -> Event {
        Event::new(
            "Rust Conf".to_string(),
            Utc::now(),
            "Berlin".to_string(),
            stock,
        )
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_values() {
        let store = InMemoryEventStore::new();
        let event = store.create(sample_event(100)).await.unwrap();

        let fetched = store.get(event.id).await.unwrap();
        assert_eq!(fetched, event);
    }

    #[tokio::test]
    async fn test_create_assigns_store_timestamps() {
        let store = InMemoryEventStore::new();
        let mut event = sample_event(10);
        let stale = Utc::now() - chrono::Duration::days(1);
        event.created_at = stale;
        event.updated_at = stale;

        let created = store.create(event).await.unwrap();
        assert!(created.created_at > stale);
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_get_unknown_event_is_not_found() {
        let store = InMemoryEventStore::new();
        let err = store.get(EventId::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_unknown_event_is_not_found() {
        let store = InMemoryEventStore::new();
        let err = store.delete(EventId::new()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_availability_is_exact_boundary() {
        let store = InMemoryEventStore::new();
        let event = store.create(sample_event(10)).await.unwrap();

        assert!(store.check_availability(event.id, 10).await.unwrap());
        assert!(!store.check_availability(event.id, 11).await.unwrap());
    }

    #[tokio::test]
    async fn test_availability_unknown_event_is_not_found() {
        let store = InMemoryEventStore::new();
        let err = store
            .check_availability(EventId::new(), 1)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_availability_rejects_non_positive_quantity() {
        let store = InMemoryEventStore::new();
        let event = store.create(sample_event(10)).await.unwrap();

        let err = store.check_availability(event.id, 0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[tokio::test]
    async fn test_decrement_refuses_overdraw() {
        let store = InMemoryEventStore::new();
        let event = store.create(sample_event(5)).await.unwrap();

        let err = store.decrement_stock(event.id, 6).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
        assert_eq!(store.get(event.id).await.unwrap().ticket_stock, 5);
    }

    #[tokio::test]
    async fn test_restore_adds_stock_back() {
        let store = InMemoryEventStore::new();
        let event = store.create(sample_event(5)).await.unwrap();

        store.decrement_stock(event.id, 3).await.unwrap();
        store.restore_stock(event.id, 3).await.unwrap();
        assert_eq!(store.get(event.id).await.unwrap().ticket_stock, 5);
    }

    #[tokio::test]
    async fn test_concurrent_decrements_never_overdraw() {
        // Stock 55, 10 callers of quantity 10: exactly five may win.
        let store = Arc::new(InMemoryEventStore::new());
        let event = store.create(sample_event(55)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = Arc::clone(&store);
            let id = event.id;
            handles.push(tokio::spawn(async move {
                store.decrement_stock(id, 10).await.is_ok()
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap() {
                successes += 1;
            }
        }

        assert_eq!(successes, 5);
        assert_eq!(store.get(event.id).await.unwrap().ticket_stock, 5);
    }
}
