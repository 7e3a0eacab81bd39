//! HTTP DTOs (Data Transfer Objects) for notification endpoints.
//!
//! These types define the JSON request/response structure for the
//! notifications API. They serve as the boundary between HTTP and the
//! application layer.

use crate::domain::foundation::Role;
use crate::domain::notify::{Event, EventKind};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to publish a system notification.
///
/// Leaving both target lists empty broadcasts to every connected client.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishNotificationRequest {
    /// Optional headline shown above the message.
    #[serde(default)]
    pub title: Option<String>,
    /// The notification body. Must not be blank.
    pub message: String,
    /// Specific recipient user ids. Non-empty wins over `target_roles`.
    #[serde(default)]
    pub target_user_ids: Vec<String>,
    /// Role-wide recipients, e.g. `"ADMIN"` or `"AGENT"`.
    #[serde(default)]
    pub target_roles: Vec<Role>,
}

/// Query parameters for the recent-events endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RecentEventsParams {
    /// Maximum number of events to return, oldest first.
    #[serde(default)]
    pub limit: Option<usize>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response after accepting a notification for broadcast.
#[derive(Debug, Clone, Serialize)]
pub struct PublishNotificationResponse {
    /// Id of the event handed to the broadcaster.
    pub event_id: String,
}

/// A single event in a recent-events listing.
#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    /// Event id.
    pub id: String,
    /// Event kind, kebab-case.
    pub kind: EventKind,
    /// Kind-specific payload, passed through untouched.
    pub payload: JsonValue,
    /// When the event occurred (ISO 8601).
    pub occurred_at: String,
    /// User whose action produced the event, if attributable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_user_id: Option<String>,
    /// Role of the originating user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_role: Option<Role>,
    /// Specific recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_user_ids: Vec<String>,
    /// Role-wide recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_roles: Vec<Role>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id.to_string(),
            kind: event.kind,
            payload: event.payload,
            occurred_at: event.occurred_at.as_datetime().to_rfc3339(),
            origin_user_id: event.origin_user_id.map(|id| id.to_string()),
            origin_role: event.origin_role,
            target_user_ids: event
                .target_user_ids
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
            target_roles: event.target_roles,
        }
    }
}

/// Response for the recent-events listing, oldest first.
#[derive(Debug, Clone, Serialize)]
pub struct RecentEventsResponse {
    /// The events, oldest first.
    pub events: Vec<EventResponse>,
    /// Number of events returned.
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use serde_json::json;

    #[test]
    fn publish_request_deserializes_with_defaults() {
        let request: PublishNotificationRequest =
            serde_json::from_str(r#"{"message": "maintenance at noon"}"#).unwrap();

        assert_eq!(request.message, "maintenance at noon");
        assert!(request.title.is_none());
        assert!(request.target_user_ids.is_empty());
        assert!(request.target_roles.is_empty());
    }

    #[test]
    fn publish_request_accepts_targets() {
        let request: PublishNotificationRequest = serde_json::from_value(json!({
            "title": "Heads up",
            "message": "new lead assigned",
            "target_user_ids": ["u-1", "u-2"],
            "target_roles": ["ADMIN"],
        }))
        .unwrap();

        assert_eq!(request.target_user_ids, vec!["u-1", "u-2"]);
        assert_eq!(request.target_roles, vec![Role::Admin]);
    }

    #[test]
    fn event_response_serializes_from_domain_event() {
        let event = Event::new(EventKind::SystemNotification, json!({"message": "hi"}))
            .for_users([UserId::new("u-9").unwrap()]);

        let response = EventResponse::from(event.clone());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["id"], event.id.to_string());
        assert_eq!(value["kind"], "system-notification");
        assert_eq!(value["payload"]["message"], "hi");
        assert_eq!(value["target_user_ids"][0], "u-9");
        // Empty target lists are omitted from the wire format
        assert!(value.get("target_roles").is_none());
        assert!(value.get("origin_user_id").is_none());
    }

    #[test]
    fn recent_events_params_default_limit_is_none() {
        let params: RecentEventsParams = serde_json::from_str("{}").unwrap();
        assert!(params.limit.is_none());
    }
}
