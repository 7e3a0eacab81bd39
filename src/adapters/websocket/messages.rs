//! WebSocket message types for the live event feed.
//!
//! Defines the protocol between server and connected clients:
//! - Server → Client: Connection status, event frames, pongs
//! - Client → Server: Pings

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Role;
use crate::domain::notify::{Event, EventKind};

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established and rooms joined.
    Connected(ConnectedMessage),

    /// A portal event addressed to this client.
    Event(EventMessage),

    /// Heartbeat response.
    Pong(PongMessage),
}

/// Sent when a client successfully connects and joins its rooms.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub client_id: String,
    pub user_id: String,
    pub role: Role,
    pub timestamp: String,
}

/// A portal event as delivered over the socket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    pub id: String,
    pub kind: EventKind,
    pub payload: serde_json::Value,
    pub occurred_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_role: Option<Role>,
}

impl From<Event> for EventMessage {
    fn from(event: Event) -> Self {
        Self {
            id: event.id.to_string(),
            kind: event.kind,
            payload: event.payload,
            occurred_at: event.occurred_at.as_datetime().to_rfc3339(),
            origin_user_id: event.origin_user_id.map(|id| id.to_string()),
            origin_role: event.origin_role,
        }
    }
}

impl From<Event> for ServerMessage {
    fn from(event: Event) -> Self {
        ServerMessage::Event(EventMessage::from(event))
    }
}

/// Heartbeat response.
#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat request.
    Ping,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use serde_json::json;

    #[test]
    fn connected_message_serializes_with_type_tag() {
        let msg = ServerMessage::Connected(ConnectedMessage {
            client_id: "client-456".to_string(),
            user_id: "u42".to_string(),
            role: Role::Agent,
            timestamp: "2026-01-10T00:00:00Z".to_string(),
        });

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"connected""#));
        assert!(json.contains(r#""clientId":"client-456""#));
        assert!(json.contains(r#""role":"AGENT""#));
    }

    #[test]
    fn event_message_serializes_with_camel_case_fields() {
        let event = Event::new(EventKind::RoleChanged, json!({"newRole": "AGENT"}))
            .with_origin(UserId::new("admin-1").unwrap(), Role::Admin);

        let msg = ServerMessage::from(event.clone());
        let json = serde_json::to_string(&msg).unwrap();

        assert!(json.contains(r#""type":"event""#));
        assert!(json.contains(r#""kind":"role-changed""#));
        assert!(json.contains(r#""occurredAt""#));
        assert!(json.contains(r#""originUserId":"admin-1""#));
        assert!(json.contains(&event.id.to_string()));
    }

    #[test]
    fn event_message_omits_absent_origin() {
        let event = Event::new(EventKind::SystemNotification, json!({"message": "hi"}));

        let json = serde_json::to_string(&ServerMessage::from(event)).unwrap();

        assert!(!json.contains("originUserId"));
        assert!(!json.contains("originRole"));
    }

    #[test]
    fn client_message_deserializes_ping() {
        let json = r#"{"type": "ping"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn pong_serializes_with_type_tag() {
        let msg = ServerMessage::Pong(PongMessage {
            timestamp: "2026-01-10T00:00:00Z".to_string(),
        });

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"pong""#));
    }
}
