//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod crm;
pub mod notify;
