//! End-to-end purchase saga tests over in-process service wiring.
//!
//! The event and notification services run in-process behind their API
//! traits, exactly as the orchestrator sees them over HTTP, so these tests
//! exercise the full check / reserve / create / notify flow including
//! compensation.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use async_trait::async_trait;
use event_service::rpc::{CreateEventRequest, EventApi};
use event_service::service::EventService;
use event_service::store::InMemoryEventStore;
use notification_service::rpc::{
    ListNotificationsResponse, NotificationApi, NotificationResponse, SendNotificationRequest,
};
use notification_service::service::NotificationService;
use notification_service::store::InMemoryNotificationStore;
use platform_core::{Error, ErrorKind, Result};
use std::sync::Arc;
use ticket_service::domain::{Ticket, TicketStatus};
use ticket_service::notifier::Notifier;
use ticket_service::rpc::{PurchaseTicketRequest, TicketApi};
use ticket_service::service::TicketService;
use ticket_service::store::{InMemoryTicketStore, TicketStore};

/// Notification API that always fails, simulating an unavailable service.
struct FailingNotificationApi;

#[async_trait]
impl NotificationApi for FailingNotificationApi {
    async fn send_notification(
        &self,
        _req: SendNotificationRequest,
    ) -> Result<NotificationResponse> {
        Err(Error::internal("notification service unavailable"))
    }

    async fn get_notifications(&self, _user_id: &str) -> Result<ListNotificationsResponse> {
        Err(Error::internal("notification service unavailable"))
    }
}

/// Ticket store whose writes fail, for exercising saga compensation.
#[derive(Default)]
struct FailingTicketStore {
    inner: InMemoryTicketStore,
}

#[async_trait]
impl TicketStore for FailingTicketStore {
    async fn create(&self, _ticket: Ticket) -> Result<Ticket> {
        Err(Error::internal("ticket store unavailable"))
    }

    async fn get(&self, id: ticket_service::domain::TicketId) -> Result<Ticket> {
        self.inner.get(id).await
    }

    async fn get_by_user(&self, user_id: &str) -> Result<Vec<Ticket>> {
        self.inner.get_by_user(user_id).await
    }

    async fn update_status(
        &self,
        id: ticket_service::domain::TicketId,
        expected: TicketStatus,
        next: TicketStatus,
    ) -> Result<Ticket> {
        self.inner.update_status(id, expected, next).await
    }

    async fn active_for_event(&self, event_id: &str) -> Result<Vec<Ticket>> {
        self.inner.active_for_event(event_id).await
    }
}

struct Harness {
    events: Arc<EventService>,
    tickets: Arc<InMemoryTicketStore>,
    service: TicketService,
}

fn harness_with(notifications: Arc<dyn NotificationApi>) -> Harness {
    let events = Arc::new(EventService::new(Arc::new(InMemoryEventStore::new())));
    let tickets = Arc::new(InMemoryTicketStore::new());
    let (notifier, _worker) = Notifier::spawn(notifications, 16);
    let service = TicketService::new(tickets.clone(), events.clone(), notifier);
    Harness {
        events,
        tickets,
        service,
    }
}

fn harness() -> Harness {
    harness_with(Arc::new(NotificationService::new(Arc::new(
        InMemoryNotificationStore::new(),
    ))))
}

async fn create_event(events: &EventService, stock: i32) -> String {
    let created = events
        .create_event(CreateEventRequest {
            name: "Rust Conf".to_string(),
            date: "2026-09-01T19:00:00Z".to_string(),
            location: "Berlin".to_string(),
            ticket_stock: stock,
        })
        .await
        .unwrap();
    created.id
}

fn purchase(event_id: &str, quantity: i32) -> PurchaseTicketRequest {
    PurchaseTicketRequest {
        event_id: event_id.to_string(),
        user_id: "user-1".to_string(),
        quantity,
    }
}

#[tokio::test]
async fn test_purchase_creates_reserved_ticket_and_takes_stock() {
    let h = harness();
    let event_id = create_event(&h.events, 100).await;

    let ticket = h.service.purchase_ticket(purchase(&event_id, 50)).await.unwrap();
    assert_eq!(ticket.status, TicketStatus::Reserved);
    assert_eq!(ticket.event_id, event_id);
    assert_eq!(ticket.user_id, "user-1");

    // The reservation decremented the event's stock.
    let event = h.events.get_event(&event_id).await.unwrap();
    assert_eq!(event.ticket_stock, 50);

    // The ticket is readable back through the API.
    let fetched = h.service.get_ticket(&ticket.id).await.unwrap();
    assert_eq!(fetched, ticket);
}

#[tokio::test]
async fn test_second_purchase_beyond_stock_is_rejected() {
    // Stock 100: buying 50 succeeds, buying 60 afterwards must fail
    // because reservation is tied to ticket creation.
    let h = harness();
    let event_id = create_event(&h.events, 100).await;

    h.service.purchase_ticket(purchase(&event_id, 50)).await.unwrap();

    let err = h
        .service
        .purchase_ticket(purchase(&event_id, 60))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceExhausted);

    // Exactly one ticket exists and stock is unchanged by the failure.
    assert_eq!(h.tickets.len().await, 1);
    let event = h.events.get_event(&event_id).await.unwrap();
    assert_eq!(event.ticket_stock, 50);
}

#[tokio::test]
async fn test_insufficient_stock_creates_no_ticket() {
    let h = harness();
    let event_id = create_event(&h.events, 10).await;

    let err = h
        .service
        .purchase_ticket(purchase(&event_id, 11))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
    assert!(h.tickets.is_empty().await);
}

#[tokio::test]
async fn test_purchase_succeeds_when_notification_service_is_down() {
    let h = harness_with(Arc::new(FailingNotificationApi));
    let event_id = create_event(&h.events, 20).await;

    let ticket = h.service.purchase_ticket(purchase(&event_id, 5)).await.unwrap();
    assert_eq!(ticket.status, TicketStatus::Reserved);
    assert_eq!(h.tickets.len().await, 1);
}

#[tokio::test]
async fn test_purchase_notification_names_the_event() {
    let store = Arc::new(InMemoryNotificationStore::new());
    let notifications = Arc::new(NotificationService::new(store));

    let events = Arc::new(EventService::new(Arc::new(InMemoryEventStore::new())));
    let tickets = Arc::new(InMemoryTicketStore::new());
    let (notifier, worker) = Notifier::spawn(notifications.clone(), 16);
    let service = TicketService::new(tickets, events.clone(), notifier);

    let event_id = create_event(&events, 10).await;
    service.purchase_ticket(purchase(&event_id, 2)).await.unwrap();

    // Dropping the service releases the last queue handle; the worker
    // drains the queue and exits.
    drop(service);
    worker.await.unwrap();

    let listed = notifications.get_notifications("user-1").await.unwrap();
    assert_eq!(listed.notifications.len(), 1);
    assert!(
        listed.notifications[0]
            .message
            .contains("Rust Conf")
    );
}

#[tokio::test]
async fn test_failed_ticket_write_releases_reserved_stock() {
    let events = Arc::new(EventService::new(Arc::new(InMemoryEventStore::new())));
    let (notifier, _worker) = Notifier::spawn(
        Arc::new(NotificationService::new(Arc::new(
            InMemoryNotificationStore::new(),
        ))),
        16,
    );
    let service = TicketService::new(
        Arc::new(FailingTicketStore::default()),
        events.clone(),
        notifier,
    );

    let event_id = create_event(&events, 100).await;

    let err = service
        .purchase_ticket(purchase(&event_id, 30))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);

    // Compensation put the reserved stock back.
    let event = events.get_event(&event_id).await.unwrap();
    assert_eq!(event.ticket_stock, 100);
}

#[tokio::test]
async fn test_purchase_validation_rejects_bad_input() {
    let h = harness();
    let event_id = create_event(&h.events, 10).await;

    for req in [
        purchase("", 1),
        PurchaseTicketRequest {
            event_id: event_id.clone(),
            user_id: String::new(),
            quantity: 1,
        },
        purchase(&event_id, 0),
        purchase(&event_id, -2),
    ] {
        let err = h.service.purchase_ticket(req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
    assert!(h.tickets.is_empty().await);
}

#[tokio::test]
async fn test_purchase_for_unknown_event_surfaces_internal() {
    // A failed availability check, unknown event included, is the
    // orchestrator's failure, not the caller's: it maps to internal.
    let h = harness();
    let missing = uuid::Uuid::new_v4().to_string();

    let err = h.service.purchase_ticket(purchase(&missing, 1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(h.tickets.is_empty().await);
}

#[tokio::test]
async fn test_ticket_lifecycle_after_purchase() {
    let h = harness();
    let event_id = create_event(&h.events, 10).await;

    let ticket = h.service.purchase_ticket(purchase(&event_id, 2)).await.unwrap();

    // Active demand for the event includes the fresh reservation.
    let active = h.service.active_tickets_for_event(&event_id).await.unwrap();
    assert_eq!(active.tickets.len(), 1);

    // Reserved -> Confirmed -> Used, with an invalid edge rejected along
    // the way.
    use ticket_service::domain::TicketTransition;
    use ticket_service::rpc::TransitionTicketRequest;

    let confirmed = h
        .service
        .transition_ticket(
            &ticket.id,
            TransitionTicketRequest {
                action: TicketTransition::Confirm,
            },
        )
        .await
        .unwrap();
    assert_eq!(confirmed.status, TicketStatus::Confirmed);

    let err = h
        .service
        .transition_ticket(
            &ticket.id,
            TransitionTicketRequest {
                action: TicketTransition::Confirm,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let used = h
        .service
        .transition_ticket(
            &ticket.id,
            TransitionTicketRequest {
                action: TicketTransition::Use,
            },
        )
        .await
        .unwrap();
    assert_eq!(used.status, TicketStatus::Used);

    // A used ticket no longer counts as demand.
    let active = h.service.active_tickets_for_event(&event_id).await.unwrap();
    assert!(active.tickets.is_empty());
}

#[tokio::test]
async fn test_get_ticket_rejects_malformed_id_before_lookup() {
    let h = harness();

    let err = h.service.get_ticket("not-a-uuid").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);

    let err = h
        .service
        .get_ticket(&uuid::Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_concurrent_purchases_never_oversell() {
    // Stock 55, ten concurrent buyers of 10 each: exactly five win.
    let h = harness();
    let event_id = create_event(&h.events, 55).await;

    let service = Arc::new(h.service);
    let mut handles = Vec::new();
    for i in 0..10 {
        let service = Arc::clone(&service);
        let event_id = event_id.clone();
        handles.push(tokio::spawn(async move {
            service
                .purchase_ticket(PurchaseTicketRequest {
                    event_id,
                    user_id: format!("user-{i}"),
                    quantity: 10,
                })
                .await
                .is_ok()
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap() {
            successes += 1;
        }
    }

    assert_eq!(successes, 5);
    assert_eq!(h.tickets.len().await, 5);
    let event = h.events.get_event(&event_id).await.unwrap();
    assert_eq!(event.ticket_stock, 5);
}
