//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that verifies Bearer tokens and injects user into extensions
//! - `RequireAuth` - Extractor that requires authentication
//! - `RequireStaff` - Extractor that requires an ADMIN or AGENT user
//! - `RequireAdmin` - Extractor that requires an ADMIN user
//! - `OptionalAuth` - Extractor for optional authentication
//!
//! # Architecture
//!
//! The middleware uses the `TokenVerifier` port, keeping it provider-agnostic.
//! Whether tokens come from the portal's identity service or a mock for
//! testing, the middleware doesn't change.
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get, middleware};
//! use std::sync::Arc;
//!
//! let verifier: Arc<dyn TokenVerifier> = Arc::new(MockTokenVerifier::new());
//!
//! let app = Router::new()
//!     .route("/api/protected", get(protected_handler))
//!     .layer(middleware::from_fn_with_state(verifier.clone(), auth_middleware));
//!
//! async fn protected_handler(RequireAuth(user): RequireAuth) -> String {
//!     format!("Hello, {}!", user.email)
//! }
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, AuthenticatedUser, Role};
use crate::ports::TokenVerifier;

/// Auth middleware state - wraps the token verifier.
pub type AuthState = Arc<dyn TokenVerifier>;

/// Authentication middleware that verifies Bearer tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Verifies the token using the `TokenVerifier` port
/// 3. On success, injects `AuthenticatedUser` into request extensions
/// 4. On missing token, continues without injecting (for optional auth routes)
/// 5. On invalid token, returns 401 Unauthorized
///
/// # Token Extraction
///
/// Expects the token in the `Authorization` header with `Bearer` prefix:
/// ```text
/// Authorization: Bearer <token>
/// ```
pub async fn auth_middleware(
    State(verifier): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Extract Bearer token from Authorization header
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) => {
            // Verify the token
            match verifier.verify(token).await {
                Ok(user) => {
                    // Inject authenticated user into request extensions
                    request.extensions_mut().insert(user);
                    next.run(request).await
                }
                Err(e) => {
                    // Token verification failed
                    let (status, message) = match &e {
                        AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
                        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
                        AuthError::UnknownRole(_) => {
                            (StatusCode::UNAUTHORIZED, "Unknown role in token")
                        }
                        AuthError::ServiceUnavailable(msg) => {
                            tracing::error!("Auth service unavailable: {}", msg);
                            (
                                StatusCode::SERVICE_UNAVAILABLE,
                                "Authentication service unavailable",
                            )
                        }
                        _ => (StatusCode::UNAUTHORIZED, "Authentication failed"),
                    };

                    (
                        status,
                        Json(serde_json::json!({
                            "error": message,
                            "code": "AUTH_ERROR"
                        })),
                    )
                        .into_response()
                }
            }
        }
        None => {
            // No token provided - continue without auth
            // Handlers can use RequireAuth to enforce authentication
            next.run(request).await
        }
    }
}

/// Extractor that requires authentication.
///
/// Use this extractor in handlers that require an authenticated user.
/// If no user is in the request extensions (i.e., auth middleware didn't
/// successfully verify a token), returns 401 Unauthorized.
///
/// # Example
///
/// ```ignore
/// async fn my_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AuthenticatedUser>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Extractor that requires a staff user (ADMIN or AGENT).
///
/// Returns 401 if unauthenticated, 403 if the user is a CLIENT.
#[derive(Debug, Clone)]
pub struct RequireStaff(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user = parts
                .extensions
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or(AuthRejection::Unauthenticated)?;

            if !user.role.is_staff() {
                return Err(AuthRejection::Forbidden);
            }

            Ok(RequireStaff(user))
        })
    }
}

/// Extractor that requires an ADMIN user.
///
/// Returns 401 if unauthenticated, 403 for any other role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user = parts
                .extensions
                .get::<AuthenticatedUser>()
                .cloned()
                .ok_or(AuthRejection::Unauthenticated)?;

            if user.role != Role::Admin {
                return Err(AuthRejection::Forbidden);
            }

            Ok(RequireAdmin(user))
        })
    }
}

/// Extractor for optional authentication.
///
/// Use when authentication is optional - returns `None` if no valid
/// token was provided, `Some(user)` if authenticated.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl<S> axum::extract::FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user = parts.extensions.get::<AuthenticatedUser>().cloned();
            Ok(OptionalAuth(user))
        })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid authentication token was provided.
    Unauthenticated,
    /// The authenticated user's role does not allow this operation.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "Authentication required",
            ),
            AuthRejection::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Insufficient permissions",
            ),
        };

        (
            status,
            Json(serde_json::json!({
                "error": message,
                "code": code
            })),
        )
            .into_response()
    }
}
