//! Axum router configuration for notification endpoints.
//!
//! This module defines the route structure for the notifications API and
//! wires it to the corresponding handlers.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{publish_notification, recent_events, NotificationsAppState};

/// Create the notifications API router.
///
/// # Routes
///
/// ## Admin Endpoints (require admin role)
/// - `POST /` - Publish a notification for broadcast
/// - `GET /recent` - List recent events, oldest first
pub fn notification_routes() -> Router<NotificationsAppState> {
    Router::new()
        .route("/", post(publish_notification))
        .route("/recent", get(recent_events))
}
