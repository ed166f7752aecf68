//! Axum gateway for the ticket service.

use crate::rpc::{
    ListTicketsResponse, PurchaseTicketRequest, TicketApi, TicketResponse,
    TransitionTicketRequest,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use platform_core::{Error, health::health_check};
use std::sync::Arc;

/// Shared state for the ticket gateway.
#[derive(Clone)]
pub struct AppState {
    /// The service behind the gateway.
    pub api: Arc<dyn TicketApi>,
}

/// Build the ticket service router.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/tickets", post(purchase_ticket))
        .route("/tickets/:id", get(get_ticket))
        .route("/tickets/:id/status", post(transition_ticket))
        .route("/users/:user_id/tickets", get(tickets_for_user))
        .route("/events/:event_id/tickets/active", get(active_tickets));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .with_state(state)
}

async fn purchase_ticket(
    State(state): State<AppState>,
    Json(request): Json<PurchaseTicketRequest>,
) -> Result<(StatusCode, Json<TicketResponse>), Error> {
    let ticket = state.api.purchase_ticket(request).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TicketResponse>, Error> {
    Ok(Json(state.api.get_ticket(&id).await?))
}

async fn transition_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<TransitionTicketRequest>,
) -> Result<Json<TicketResponse>, Error> {
    Ok(Json(state.api.transition_ticket(&id, request).await?))
}

async fn tickets_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ListTicketsResponse>, Error> {
    Ok(Json(state.api.tickets_for_user(&user_id).await?))
}

async fn active_tickets(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<ListTicketsResponse>, Error> {
    Ok(Json(state.api.active_tickets_for_event(&event_id).await?))
}
