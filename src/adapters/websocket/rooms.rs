//! WebSocket room management for targeted event routing.
//!
//! Every connected client joins three rooms: its own user room, its role
//! room, and the shared broadcast room. Event targeting then reduces to
//! picking rooms.
//!
//! # Architecture
//!
//! ```text
//! Room: user:u42     Room: role:ADMIN    Room: all
//! └── client-a       ├── client-a        ├── client-a
//!                    └── client-b        ├── client-b
//!                                        └── client-c
//! ```
//!
//! A `role-changed` event targeted at u42 goes to the `user:u42` room and
//! reaches only client-a.

use std::collections::{HashMap, HashSet};

use tokio::sync::{mpsc, RwLock};

use crate::domain::foundation::{ClientId, Role, UserId};

use super::messages::ServerMessage;

/// A routing destination. Clients sit in one user room, one role room and
/// the shared `All` room for the length of their connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Room {
    User(UserId),
    Role(Role),
    All,
}

impl std::fmt::Display for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Room::User(user_id) => write!(f, "user:{}", user_id),
            Room::Role(role) => write!(f, "role:{}", role.as_str()),
            Room::All => write!(f, "all"),
        }
    }
}

struct ClientEntry {
    sender: mpsc::Sender<ServerMessage>,
    rooms: Vec<Room>,
}

/// Manages WebSocket connection rooms for identity-based routing.
///
/// Provides:
/// - Client connect/disconnect with automatic room membership
/// - Fan-out of a message to every client in a set of rooms, at most once
///   per client
/// - Automatic cleanup of empty rooms
///
/// Each client gets its own bounded queue. A client that stops draining its
/// socket fills the queue and starts losing messages; it never blocks the
/// broadcaster or other clients.
///
/// # Thread Safety
///
/// Uses `RwLock` for the registries since fan-outs (reads) vastly outnumber
/// connects and disconnects (writes).
pub struct RoomManager {
    /// Map of room → member client ids.
    rooms: RwLock<HashMap<Room, HashSet<ClientId>>>,

    /// Map of client id → queue sender and joined rooms.
    clients: RwLock<HashMap<ClientId, ClientEntry>>,

    /// Queue capacity for each client.
    client_buffer: usize,
}

impl RoomManager {
    /// Create a new room manager with the given per-client queue capacity.
    pub fn new(client_buffer: usize) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            clients: RwLock::new(HashMap::new()),
            client_buffer,
        }
    }

    /// Create with the default per-client queue capacity (64 messages).
    pub fn with_default_capacity() -> Self {
        Self::new(64)
    }

    /// Register a client and join its user, role and broadcast rooms.
    ///
    /// Returns the new client id and the receiving end of the client's
    /// queue. The connection task drains the receiver into the socket.
    pub async fn connect(
        &self,
        user_id: &UserId,
        role: Role,
    ) -> (ClientId, mpsc::Receiver<ServerMessage>) {
        let client_id = ClientId::new();
        let (tx, rx) = mpsc::channel(self.client_buffer);
        let joined = vec![Room::User(user_id.clone()), Room::Role(role), Room::All];

        {
            let mut rooms = self.rooms.write().await;
            for room in &joined {
                rooms.entry(room.clone()).or_default().insert(client_id);
            }
        }

        self.clients.write().await.insert(
            client_id,
            ClientEntry {
                sender: tx,
                rooms: joined,
            },
        );

        tracing::debug!(client_id = %client_id, user_id = %user_id, role = %role, "client connected");

        (client_id, rx)
    }

    /// Remove a client from every room it joined.
    ///
    /// Rooms that become empty are cleaned up.
    pub async fn disconnect(&self, client_id: &ClientId) {
        let Some(entry) = self.clients.write().await.remove(client_id) else {
            return;
        };

        let mut rooms = self.rooms.write().await;
        for room in &entry.rooms {
            if let Some(members) = rooms.get_mut(room) {
                members.remove(client_id);
                if members.is_empty() {
                    rooms.remove(room);
                }
            }
        }

        tracing::debug!(client_id = %client_id, "client disconnected");
    }

    /// Send a message to every client in any of the given rooms.
    ///
    /// Each client receives the message at most once, even when it sits in
    /// several of the rooms. A client whose queue is full loses the message;
    /// the drop is logged and the fan-out continues.
    ///
    /// Returns the number of clients the message was queued for.
    pub async fn broadcast(&self, targets: &[Room], message: ServerMessage) -> usize {
        let recipients: HashSet<ClientId> = {
            let rooms = self.rooms.read().await;
            targets
                .iter()
                .filter_map(|room| rooms.get(room))
                .flatten()
                .copied()
                .collect()
        };

        if recipients.is_empty() {
            return 0;
        }

        let clients = self.clients.read().await;
        let mut queued = 0;
        for client_id in &recipients {
            let Some(entry) = clients.get(client_id) else {
                continue;
            };
            match entry.sender.try_send(message.clone()) {
                Ok(()) => queued += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(
                        client_id = %client_id,
                        "client queue full, dropping message"
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    // Receiver already gone; disconnect cleanup is pending.
                    tracing::debug!(client_id = %client_id, "client queue closed");
                }
            }
        }

        queued
    }

    /// Get count of clients in a specific room (0 if the room is empty).
    pub async fn room_size(&self, room: &Room) -> usize {
        self.rooms
            .read()
            .await
            .get(room)
            .map(|members| members.len())
            .unwrap_or(0)
    }

    /// Get all active rooms (for monitoring/debugging).
    pub async fn active_rooms(&self) -> Vec<Room> {
        self.rooms.read().await.keys().cloned().collect()
    }

    /// Get total count of connected clients.
    pub async fn client_count(&self) -> usize {
        self.clients.read().await.len()
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notify::{Event, EventKind};
    use serde_json::json;

    fn uid(s: &str) -> UserId {
        UserId::new(s).unwrap()
    }

    fn test_message() -> ServerMessage {
        ServerMessage::from(Event::new(
            EventKind::SystemNotification,
            json!({"message": "test"}),
        ))
    }

    #[tokio::test]
    async fn connect_joins_user_role_and_broadcast_rooms() {
        let manager = RoomManager::with_default_capacity();

        let (_client, _rx) = manager.connect(&uid("u42"), Role::Agent).await;

        assert_eq!(manager.room_size(&Room::User(uid("u42"))).await, 1);
        assert_eq!(manager.room_size(&Room::Role(Role::Agent)).await, 1);
        assert_eq!(manager.room_size(&Room::All).await, 1);
        assert_eq!(manager.client_count().await, 1);
    }

    #[tokio::test]
    async fn broadcast_to_all_reaches_every_client() {
        let manager = RoomManager::with_default_capacity();
        let (_c1, mut rx1) = manager.connect(&uid("u1"), Role::Admin).await;
        let (_c2, mut rx2) = manager.connect(&uid("u2"), Role::Client).await;

        let queued = manager.broadcast(&[Room::All], test_message()).await;

        assert_eq!(queued, 2);
        assert!(rx1.recv().await.is_some());
        assert!(rx2.recv().await.is_some());
    }

    #[tokio::test]
    async fn broadcast_to_user_room_is_isolated() {
        let manager = RoomManager::with_default_capacity();
        let (_c1, mut rx1) = manager.connect(&uid("u42"), Role::Client).await;
        let (_c2, mut rx2) = manager.connect(&uid("u7"), Role::Client).await;

        let queued = manager
            .broadcast(&[Room::User(uid("u42"))], test_message())
            .await;

        assert_eq!(queued, 1);
        assert!(rx1.recv().await.is_some());
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_to_role_room_reaches_all_holders() {
        let manager = RoomManager::with_default_capacity();
        let (_c1, mut rx1) = manager.connect(&uid("a1"), Role::Admin).await;
        let (_c2, mut rx2) = manager.connect(&uid("a2"), Role::Admin).await;
        let (_c3, mut rx3) = manager.connect(&uid("c1"), Role::Client).await;

        let queued = manager
            .broadcast(&[Room::Role(Role::Admin)], test_message())
            .await;

        assert_eq!(queued, 2);
        assert!(rx1.recv().await.is_some());
        assert!(rx2.recv().await.is_some());
        assert!(rx3.try_recv().is_err());
    }

    #[tokio::test]
    async fn overlapping_rooms_deliver_at_most_once() {
        let manager = RoomManager::with_default_capacity();
        let (_c1, mut rx) = manager.connect(&uid("u42"), Role::Admin).await;

        // Client is in both targeted rooms; it must get one copy.
        let queued = manager
            .broadcast(
                &[Room::User(uid("u42")), Room::Role(Role::Admin)],
                test_message(),
            )
            .await;

        assert_eq!(queued, 1);
        assert!(rx.recv().await.is_some());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn same_user_connected_twice_gets_two_copies() {
        let manager = RoomManager::with_default_capacity();
        let (_c1, mut rx1) = manager.connect(&uid("u42"), Role::Client).await;
        let (_c2, mut rx2) = manager.connect(&uid("u42"), Role::Client).await;

        let queued = manager
            .broadcast(&[Room::User(uid("u42"))], test_message())
            .await;

        assert_eq!(queued, 2);
        assert!(rx1.recv().await.is_some());
        assert!(rx2.recv().await.is_some());
    }

    #[tokio::test]
    async fn disconnect_removes_client_and_empty_rooms() {
        let manager = RoomManager::with_default_capacity();
        let (client, _rx) = manager.connect(&uid("u42"), Role::Agent).await;

        manager.disconnect(&client).await;

        assert_eq!(manager.client_count().await, 0);
        assert!(manager.active_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn disconnect_keeps_rooms_with_remaining_members() {
        let manager = RoomManager::with_default_capacity();
        let (c1, _rx1) = manager.connect(&uid("u1"), Role::Agent).await;
        let (_c2, _rx2) = manager.connect(&uid("u2"), Role::Agent).await;

        manager.disconnect(&c1).await;

        assert_eq!(manager.room_size(&Room::Role(Role::Agent)).await, 1);
        assert_eq!(manager.room_size(&Room::All).await, 1);
        assert_eq!(manager.room_size(&Room::User(uid("u1"))).await, 0);
    }

    #[tokio::test]
    async fn disconnect_unknown_client_is_noop() {
        let manager = RoomManager::with_default_capacity();

        manager.disconnect(&ClientId::new()).await;

        assert_eq!(manager.client_count().await, 0);
    }

    #[tokio::test]
    async fn full_client_queue_drops_message_without_blocking() {
        let manager = RoomManager::new(1);
        let (_c1, mut rx) = manager.connect(&uid("slow"), Role::Client).await;

        // First fills the queue, second is dropped.
        let first = manager.broadcast(&[Room::All], test_message()).await;
        let second = manager.broadcast(&[Room::All], test_message()).await;

        assert_eq!(first, 1);
        assert_eq!(second, 0);
        assert!(rx.recv().await.is_some());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_to_empty_room_is_noop() {
        let manager = RoomManager::with_default_capacity();

        let queued = manager
            .broadcast(&[Room::User(uid("nobody"))], test_message())
            .await;

        assert_eq!(queued, 0);
    }

    #[tokio::test]
    async fn room_display_is_stable() {
        assert_eq!(Room::User(uid("u42")).to_string(), "user:u42");
        assert_eq!(Room::Role(Role::Admin).to_string(), "role:ADMIN");
        assert_eq!(Room::All.to_string(), "all");
    }
}
