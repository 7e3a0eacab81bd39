//! HTTP adapter for notification endpoints.
//!
//! Exposes the broadcast domain via REST API:
//! - `POST /api/notifications` - Publish a notification (admin)
//! - `GET /api/notifications/recent` - List recent events, oldest first (admin)

mod dto;
mod handlers;
mod routes;

pub use dto::{
    EventResponse, PublishNotificationRequest, PublishNotificationResponse, RecentEventsParams,
    RecentEventsResponse,
};
pub use handlers::NotificationsAppState;
pub use routes::notification_routes;
