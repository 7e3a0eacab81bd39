//! Event bridge connecting the broadcaster to WebSocket clients.
//!
//! Registered as a single broadcaster channel at startup; every published
//! event flows through here and fans out to the connected clients the
//! event's targeting selects.
//!
//! # Event Flow
//!
//! ```text
//! Event published
//!          │
//!          ▼
//! ┌────────────────────┐
//! │  EventBridge       │
//! │  receives event    │
//! └────────────────────┘
//!          │
//!          ▼
//! ┌────────────────────┐
//! │  Resolve rooms     │
//! │  from targeting    │
//! └────────────────────┘
//!          │
//!          ▼
//! ┌────────────────────┐
//! │  Fan out to every  │
//! │  client in rooms   │
//! └────────────────────┘
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::notify::{Delivery, Event};
use crate::ports::DeliveryHandler;

use super::messages::ServerMessage;
use super::rooms::{Room, RoomManager};

/// Channel id the bridge registers under.
pub const BRIDGE_CHANNEL: &str = "realtime-gateway";

/// Bridge between the broadcaster and WebSocket connections.
///
/// Implements [`DeliveryHandler`] to receive published events and route
/// them to the rooms their targeting selects.
pub struct EventBridge {
    rooms: Arc<RoomManager>,
}

impl EventBridge {
    /// Create a new event bridge over the given room manager.
    pub fn new(rooms: Arc<RoomManager>) -> Self {
        Self { rooms }
    }

    /// Create as an Arc (for registering with the broadcaster).
    pub fn new_shared(rooms: Arc<RoomManager>) -> Arc<Self> {
        Arc::new(Self::new(rooms))
    }

    /// Resolve the rooms an event's targeting selects.
    fn resolve_rooms(event: &Event) -> Vec<Room> {
        match event.delivery() {
            Delivery::Users(user_ids) => user_ids
                .iter()
                .map(|user_id| Room::User(user_id.clone()))
                .collect(),
            Delivery::Roles(roles) => roles.iter().map(|role| Room::Role(*role)).collect(),
            Delivery::Broadcast => vec![Room::All],
        }
    }
}

#[async_trait]
impl DeliveryHandler for EventBridge {
    async fn deliver(&self, event: Event) -> Result<(), DomainError> {
        let targets = Self::resolve_rooms(&event);

        let event_id = event.id;
        let kind = event.kind;
        let queued = self
            .rooms
            .broadcast(&targets, ServerMessage::from(event))
            .await;

        tracing::debug!(
            event_id = %event_id,
            kind = %kind,
            rooms = targets.len(),
            clients = queued,
            "event relayed to live clients"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "EventBridge"
    }
}
