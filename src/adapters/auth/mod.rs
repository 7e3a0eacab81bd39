//! Authentication adapters.
//!
//! Implementations of the `TokenVerifier` port:
//!
//! - `jwt` - Production HS256 verifier for portal access tokens
//! - `mock` - Test implementation that doesn't require signed tokens

mod jwt;
mod mock;

pub use jwt::{JwtConfig, JwtTokenVerifier};
pub use mock::MockTokenVerifier;
