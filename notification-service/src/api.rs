//! Axum gateway for the notification service.

use crate::rpc::{
    ListNotificationsResponse, NotificationApi, NotificationResponse, SendNotificationRequest,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use platform_core::{Error, health::health_check};
use std::sync::Arc;

/// Shared state for the notification gateway.
#[derive(Clone)]
pub struct AppState {
    /// The service behind the gateway.
    pub api: Arc<dyn NotificationApi>,
}

/// Build the notification service router.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/notifications", post(send_notification))
        .route("/users/:user_id/notifications", get(get_notifications));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .with_state(state)
}

async fn send_notification(
    State(state): State<AppState>,
    Json(request): Json<SendNotificationRequest>,
) -> Result<(StatusCode, Json<NotificationResponse>), Error> {
    let notification = state.api.send_notification(request).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

async fn get_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ListNotificationsResponse>, Error> {
    Ok(Json(state.api.get_notifications(&user_id).await?))
}
