//! HTTP handlers for notification endpoints.
//!
//! Publishing and the recent-events listing are admin operations. Both are
//! thin shims over the application handlers; targeting and history semantics
//! live in the domain.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAdmin;
use crate::application::handlers::notify::{
    PublishNotificationCommand, PublishNotificationHandler, RecentActivityHandler,
    RecentActivityQuery,
};
use crate::domain::foundation::UserId;
use crate::ports::{EventPublisher, EventSubscriber};

use super::dto::{
    EventResponse, PublishNotificationRequest, PublishNotificationResponse, RecentEventsParams,
    RecentEventsResponse,
};

/// Events returned by the recent listing when no limit is given.
const DEFAULT_RECENT_LIMIT: usize = 50;

/// Shared state for notification endpoints.
#[derive(Clone)]
pub struct NotificationsAppState {
    pub publisher: Arc<dyn EventPublisher>,
    pub subscriber: Arc<dyn EventSubscriber>,
}

impl NotificationsAppState {
    /// Create handlers on demand from the shared state.
    pub fn publish_notification_handler(&self) -> PublishNotificationHandler {
        PublishNotificationHandler::new(self.publisher.clone())
    }

    pub fn recent_activity_handler(&self) -> RecentActivityHandler {
        RecentActivityHandler::new(self.subscriber.clone())
    }
}

/// POST /api/notifications
///
/// Accepts a notification for broadcast and returns `202 Accepted` with the
/// event id. Delivery is fire-and-forget; acceptance does not mean every
/// subscriber saw the event.
pub async fn publish_notification(
    State(state): State<NotificationsAppState>,
    RequireAdmin(user): RequireAdmin,
    Json(request): Json<PublishNotificationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let target_user_ids = request
        .target_user_ids
        .into_iter()
        .map(UserId::new)
        .collect::<Result<Vec<_>, _>>()?;

    let handler = state.publish_notification_handler();
    let cmd = PublishNotificationCommand {
        title: request.title,
        message: request.message,
        target_user_ids,
        target_roles: request.target_roles,
        origin_user_id: user.id,
        origin_role: user.role,
    };

    let result = handler.handle(cmd).await?;

    let response = PublishNotificationResponse {
        event_id: result.event_id.to_string(),
    };

    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// GET /api/notifications/recent?limit=N
///
/// Returns the tail of the event history, oldest first, regardless of
/// targeting. Admin-only; the listing is an operational view, not a
/// per-user feed.
pub async fn recent_events(
    State(state): State<NotificationsAppState>,
    RequireAdmin(_user): RequireAdmin,
    Query(params): Query<RecentEventsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_RECENT_LIMIT);

    let handler = state.recent_activity_handler();
    let events = handler.handle(RecentActivityQuery { limit }).await;

    let events: Vec<EventResponse> = events.into_iter().map(EventResponse::from).collect();
    let response = RecentEventsResponse {
        count: events.len(),
        events,
    };

    Ok(Json(response))
}
