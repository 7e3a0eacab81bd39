//! Mock authentication adapter for testing.
//!
//! Implements the `TokenVerifier` port for use in tests, avoiding the need
//! to mint and sign real JWTs.
//!
//! # Example
//!
//! ```ignore
//! use tol_portal::adapters::auth::MockTokenVerifier;
//! use tol_portal::domain::foundation::Role;
//!
//! let verifier = MockTokenVerifier::new().with_test_user("valid-token", "user-123", Role::Agent);
//!
//! let result = verifier.verify("valid-token").await;
//! assert!(result.is_ok());
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, UserId};
use crate::ports::TokenVerifier;

/// Mock token verifier for testing.
///
/// Stores a map of tokens to users. Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockTokenVerifier {
    /// Map of valid tokens to their associated users
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Optional error to return for all verifications (for error testing)
    force_error: RwLock<Option<AuthError>>,
}

impl MockTokenVerifier {
    /// Creates a new empty mock verifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    ///
    /// When `verify()` is called with this token, it returns the associated user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.write().unwrap().insert(token.into(), user);
        self
    }

    /// Adds a valid token with a simple test user of the given role.
    pub fn with_test_user(
        self,
        token: impl Into<String>,
        user_id: impl Into<String>,
        role: Role,
    ) -> Self {
        let user_id = user_id.into();
        let user = AuthenticatedUser::new(
            UserId::new(&user_id).unwrap(),
            role,
            format!("{}@test.example.com", user_id),
            Some(format!("Test User {}", user_id)),
        );
        self.with_user(token, user)
    }

    /// Forces all verifications to return the specified error.
    ///
    /// Useful for testing error handling paths.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Clears the forced error and returns to normal operation.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens.write().unwrap().insert(token.into(), user);
    }

    /// Removes a token, making it invalid.
    pub fn remove_token(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
    }

    /// Returns the number of registered valid tokens.
    pub fn token_count(&self) -> usize {
        self.tokens.read().unwrap().len()
    }
}

#[async_trait]
impl TokenVerifier for MockTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        // Check for forced error
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        // Look up the token
        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("user-123").unwrap(),
            Role::Client,
            "test@example.com",
            Some("Test User".to_string()),
        )
    }

    #[tokio::test]
    async fn mock_verifier_returns_user_for_registered_token() {
        let verifier = MockTokenVerifier::new().with_user("valid-token", test_user());

        let result = verifier.verify("valid-token").await;

        assert!(result.is_ok());
        let user = result.unwrap();
        assert_eq!(user.id.as_str(), "user-123");
        assert_eq!(user.email, "test@example.com");
    }

    #[tokio::test]
    async fn mock_verifier_returns_invalid_token_for_unknown() {
        let verifier = MockTokenVerifier::new();

        let result = verifier.verify("unknown-token").await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn mock_verifier_with_test_user_creates_user() {
        let verifier = MockTokenVerifier::new().with_test_user("my-token", "user-456", Role::Admin);

        let result = verifier.verify("my-token").await;

        assert!(result.is_ok());
        let user = result.unwrap();
        assert_eq!(user.id.as_str(), "user-456");
        assert_eq!(user.role, Role::Admin);
        assert!(user.email.contains("user-456"));
    }

    #[tokio::test]
    async fn mock_verifier_with_error_forces_error() {
        let verifier = MockTokenVerifier::new()
            .with_user("valid-token", test_user())
            .with_error(AuthError::ServiceUnavailable("Test error".to_string()));

        let result = verifier.verify("valid-token").await;

        assert!(matches!(result, Err(AuthError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn mock_verifier_clear_error_restores_normal_operation() {
        let verifier = MockTokenVerifier::new()
            .with_user("valid-token", test_user())
            .with_error(AuthError::ServiceUnavailable("Test".to_string()));

        // First, error is forced
        assert!(verifier.verify("valid-token").await.is_err());

        // Clear error
        verifier.clear_error();

        // Now verification works
        assert!(verifier.verify("valid-token").await.is_ok());
    }

    #[tokio::test]
    async fn mock_verifier_add_token_works_at_runtime() {
        let verifier = MockTokenVerifier::new();

        // Initially no tokens
        assert!(verifier.verify("new-token").await.is_err());

        // Add token
        verifier.add_token("new-token", test_user());

        // Now it works
        assert!(verifier.verify("new-token").await.is_ok());
    }

    #[tokio::test]
    async fn mock_verifier_remove_token_invalidates() {
        let verifier = MockTokenVerifier::new().with_user("token", test_user());

        // Works initially
        assert!(verifier.verify("token").await.is_ok());

        // Remove token
        verifier.remove_token("token");

        // Now fails
        assert!(verifier.verify("token").await.is_err());
    }

    #[test]
    fn mock_verifier_token_count_tracks_tokens() {
        let verifier = MockTokenVerifier::new()
            .with_test_user("t1", "u1", Role::Agent)
            .with_test_user("t2", "u2", Role::Client);

        assert_eq!(verifier.token_count(), 2);
    }
}
