//! Authentication types for the domain layer.
//!
//! These types represent an authenticated user extracted from a bearer token.
//! They have **no provider dependencies** - any identity service can populate
//! them via the `TokenVerifier` port.

use super::{Role, UserId};
use thiserror::Error;

/// Authenticated user extracted from a verified token.
///
/// This is a **domain type** with no provider dependencies. The portal's
/// identity service mints the tokens; this struct carries only the claims
/// this backend uses for attribution and access control.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the identity provider.
    pub id: UserId,

    /// The user's portal role.
    pub role: Role,

    /// User's email address from the token claims.
    pub email: String,

    /// Display name if available.
    pub display_name: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    ///
    /// Typically called by the `TokenVerifier` adapter after successfully
    /// verifying a token.
    pub fn new(
        id: UserId,
        role: Role,
        email: impl Into<String>,
        display_name: Option<String>,
    ) -> Self {
        Self {
            id,
            role,
            email: email.into(),
            display_name,
        }
    }

    /// Returns the user's display name, or email as fallback.
    pub fn display_name_or_email(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Authentication errors that can occur during token verification.
///
/// These errors are **domain-centric** - they describe what went wrong
/// from the application's perspective, not the identity provider's.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// Token is valid but carries a role this portal does not know.
    #[error("Unknown role in token: {0}")]
    UnknownRole(String),

    /// User exists but lacks required permissions for this action.
    #[error("Insufficient permissions")]
    InsufficientPermissions,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::UnknownRole(_)
        )
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user_id() -> UserId {
        UserId::new("user-123").unwrap()
    }

    #[test]
    fn authenticated_user_new_creates_user() {
        let user = AuthenticatedUser::new(
            test_user_id(),
            Role::Agent,
            "test@example.com",
            Some("Test User".to_string()),
        );

        assert_eq!(user.id.as_str(), "user-123");
        assert_eq!(user.role, Role::Agent);
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.display_name, Some("Test User".to_string()));
    }

    #[test]
    fn authenticated_user_display_name_or_email_returns_name_when_present() {
        let user = AuthenticatedUser::new(
            test_user_id(),
            Role::Client,
            "test@example.com",
            Some("Alice".to_string()),
        );

        assert_eq!(user.display_name_or_email(), "Alice");
    }

    #[test]
    fn authenticated_user_display_name_or_email_returns_email_when_no_name() {
        let user = AuthenticatedUser::new(test_user_id(), Role::Client, "bob@example.com", None);

        assert_eq!(user.display_name_or_email(), "bob@example.com");
    }

    #[test]
    fn auth_error_invalid_token_displays_correctly() {
        let err = AuthError::InvalidToken;
        assert_eq!(format!("{}", err), "Invalid or expired token");
    }

    #[test]
    fn auth_error_unknown_role_displays_value() {
        let err = AuthError::UnknownRole("SUPERUSER".to_string());
        assert_eq!(format!("{}", err), "Unknown role in token: SUPERUSER");
    }

    #[test]
    fn auth_error_requires_reauthentication_for_token_errors() {
        assert!(AuthError::InvalidToken.requires_reauthentication());
        assert!(AuthError::TokenExpired.requires_reauthentication());
        assert!(AuthError::UnknownRole("X".to_string()).requires_reauthentication());
        assert!(!AuthError::InsufficientPermissions.requires_reauthentication());
        assert!(!AuthError::service_unavailable("").requires_reauthentication());
    }

    #[test]
    fn auth_error_is_transient_for_service_errors() {
        assert!(AuthError::service_unavailable("timeout").is_transient());
        assert!(!AuthError::InvalidToken.is_transient());
        assert!(!AuthError::TokenExpired.is_transient());
    }
}
