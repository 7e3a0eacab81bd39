//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, roles, errors)
//! - `notify` - Notification events, targeting rules, and bounded history
//! - `crm` - Customer aggregate for the agency's client book

pub mod crm;
pub mod foundation;
pub mod notify;
