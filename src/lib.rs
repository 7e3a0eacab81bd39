//! Tree of Life Agency portal backend.
//!
//! This crate implements the portal's realtime event broadcaster, the
//! WebSocket live feed that fans events out to signed-in staff and clients,
//! and the customer book the agency works from.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
