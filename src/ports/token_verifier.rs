//! Token verification port.
//!
//! This port defines the contract for verifying bearer tokens and extracting
//! user identity. It is provider-agnostic - the production adapter verifies
//! tokens minted by the portal's identity service, and a mock exists for
//! tests and local development.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Verifies bearer tokens and extracts user identity.
///
/// This is the primary port for authentication. Both the HTTP middleware and
/// the realtime gateway use it to turn a raw token into an
/// [`AuthenticatedUser`].
///
/// # Contract
///
/// Implementations must:
/// - Verify the token signature
/// - Verify issuer, audience, and expiry claims
/// - Return `AuthError::InvalidToken` for malformed/bad signature tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::UnknownRole` when the role claim is outside the
///   portal's role set
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a bearer token and return the authenticated user.
    ///
    /// # Arguments
    ///
    /// * `token` - The raw token (without "Bearer " prefix)
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
