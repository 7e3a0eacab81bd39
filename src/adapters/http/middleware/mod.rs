//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `auth` - Authentication middleware and extractors
//! - `record` - Event recording for completed exchanges

pub mod auth;
pub mod record;

pub use auth::{
    auth_middleware, AuthRejection, AuthState, OptionalAuth, RequireAdmin, RequireAuth,
    RequireStaff,
};
pub use record::{
    activity_log, record_on_success, with_event_detail, ActivityLogState, EventDetail, EventDraft,
    RecordContext, RecordSpec, RecordState,
};
