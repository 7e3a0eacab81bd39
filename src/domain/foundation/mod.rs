//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the Tree of Life portal domain.

mod auth;
mod errors;
mod ids;
mod role;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ChannelId, ClientId, CustomerId, UserId};
pub use role::Role;
pub use timestamp::Timestamp;
