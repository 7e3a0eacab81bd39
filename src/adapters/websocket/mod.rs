//! WebSocket adapters for the live event feed.
//!
//! This module pushes portal events to connected frontend clients over
//! WebSocket connections, honoring each event's targeting.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Broadcaster                                  │
//! │   publish() → history window + registered channels                   │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ one channel
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         EventBridge                                  │
//! │   - Receives every published event                                   │
//! │   - Resolves targeting to rooms                                      │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ fan-out
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         RoomManager                                  │
//! │   Room: user:u42    Room: role:ADMIN    Room: all                    │
//! │   └── client-a      ├── client-a        ├── client-a                 │
//! │                     └── client-b        ├── client-b                 │
//! │                                         └── client-c                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`rooms`] - Room management for identity-based routing
//! - [`handler`] - Axum WebSocket upgrade handler
//! - [`bridge`] - Bridge between the broadcaster and the rooms

pub mod bridge;
pub mod handler;
pub mod messages;
pub mod rooms;

pub use bridge::{EventBridge, BRIDGE_CHANNEL};
pub use handler::{live_routes, ws_handler, WebSocketState};
pub use messages::{ClientMessage, ConnectedMessage, EventMessage, PongMessage, ServerMessage};
pub use rooms::{Room, RoomManager};
