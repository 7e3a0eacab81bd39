//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure.
//! Cross-cutting pieces live in [`error`] and [`middleware`].

pub mod customers;
pub mod error;
pub mod middleware;
pub mod notifications;

// Re-export key types for convenience
pub use customers::{customer_routes, CustomersAppState};
pub use error::{ApiError, ErrorResponse};
pub use notifications::{notification_routes, NotificationsAppState};
