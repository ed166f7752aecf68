//! Axum gateway for the event service.
//!
//! Thin HTTP/JSON projection of [`EventApi`]; all validation and business
//! rules live behind the trait.

use crate::rpc::{
    AvailabilityResponse, CreateEventRequest, EventApi, EventResponse, ListEventsResponse,
    StockRequest, UpdateEventRequest,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use platform_core::{Error, PageRequest, health::health_check};
use serde::Deserialize;
use std::sync::Arc;

/// Shared state for the event gateway.
#[derive(Clone)]
pub struct AppState {
    /// The service behind the gateway.
    pub api: Arc<dyn EventApi>,
}

/// Build the event service router.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/events", post(create_event))
        .route("/events", get(list_events))
        .route("/events/:id", get(get_event))
        .route("/events/:id", put(update_event))
        .route("/events/:id", delete(delete_event))
        .route("/events/:id/availability", get(check_availability))
        .route("/events/:id/stock/reserve", post(reserve_stock))
        .route("/events/:id/stock/release", post(release_stock));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .with_state(state)
}

async fn create_event(
    State(state): State<AppState>,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), Error> {
    let event = state.api.create_event(request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventResponse>, Error> {
    Ok(Json(state.api.get_event(&id).await?))
}

async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<EventResponse>, Error> {
    Ok(Json(state.api.update_event(&id, request).await?))
}

async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, Error> {
    state.api.delete_event(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_events(
    State(state): State<AppState>,
    Query(page): Query<PageRequest>,
) -> Result<Json<ListEventsResponse>, Error> {
    Ok(Json(state.api.list_events(page).await?))
}

/// Query parameters for the availability check.
#[derive(Deserialize)]
struct AvailabilityQuery {
    quantity: i32,
}

async fn check_availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, Error> {
    let available = state.api.check_availability(&id, query.quantity).await?;
    Ok(Json(AvailabilityResponse { available }))
}

async fn reserve_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StockRequest>,
) -> Result<StatusCode, Error> {
    state.api.reserve_stock(&id, request.quantity).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn release_stock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<StockRequest>,
) -> Result<StatusCode, Error> {
    state.api.release_stock(&id, request.quantity).await?;
    Ok(StatusCode::NO_CONTENT)
}
