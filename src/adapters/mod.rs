//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Token verification (JWT, mock)
//! - `broadcast` - In-process event broadcaster
//! - `crm` - Customer repository implementations
//! - `http` - REST API (axum)
//! - `websocket` - Live event feed

pub mod auth;
pub mod broadcast;
pub mod crm;
pub mod http;
pub mod websocket;

pub use broadcast::Broadcaster;
