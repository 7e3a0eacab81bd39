//! JWT adapter for bearer token verification.
//!
//! This adapter implements the `TokenVerifier` port for tokens minted by the
//! portal's identity service. Tokens are HS256-signed with a shared secret;
//! the adapter verifies:
//!
//! 1. Signature against the shared secret
//! 2. Issuer, audience, and expiry claims
//! 3. The `role` claim against the portal's role set
//!
//! and maps the claims to the domain `AuthenticatedUser` type. Token
//! issuance lives in the identity service, never here.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::TokenVerifier;

/// Configuration for the JWT verifier.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Expected issuer claim.
    pub issuer: String,

    /// Expected audience claim. Tokens must contain this audience.
    pub audience: String,

    /// Shared HS256 signing secret.
    pub secret: SecretString,
}

impl JwtConfig {
    /// Create a new configuration.
    pub fn new(
        issuer: impl Into<String>,
        audience: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            secret: SecretString::new(secret.into()),
        }
    }
}

/// Claims carried by portal access tokens.
#[derive(Debug, Serialize, Deserialize)]
struct PortalClaims {
    /// Subject - the user ID
    sub: String,

    /// Issuer
    iss: String,

    /// Audience - array or single string
    #[serde(default)]
    aud: Audience,

    /// Expiry timestamp (Unix epoch seconds)
    exp: i64,

    /// Issued at timestamp
    #[serde(default)]
    iat: Option<i64>,

    /// Portal role (ADMIN / AGENT / CLIENT)
    role: String,

    /// User's email address
    #[serde(default)]
    email: Option<String>,

    /// User's display name
    #[serde(default)]
    name: Option<String>,
}

/// Audience can be a single string or array of strings in JWTs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
enum Audience {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::None => false,
            Audience::Single(s) => s == expected,
            Audience::Multiple(v) => v.iter().any(|s| s == expected),
        }
    }
}

/// HS256 token verifier.
///
/// This is the production implementation of `TokenVerifier`.
pub struct JwtTokenVerifier {
    config: JwtConfig,
    decoding_key: DecodingKey,
}

impl JwtTokenVerifier {
    /// Create a new verifier from configuration.
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.expose_secret().as_bytes());
        Self {
            config,
            decoding_key,
        }
    }

    /// Decode and validate a token, returning its claims.
    fn validate_token(&self, token: &str) -> Result<TokenData<PortalClaims>, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);

        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        decode::<PortalClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("Invalid issuer in token");
                    AuthError::InvalidToken
                }
                ErrorKind::InvalidAudience => {
                    tracing::warn!("Invalid audience in token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::warn!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })
    }
}

#[async_trait]
impl TokenVerifier for JwtTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let token_data = self.validate_token(token)?;
        let claims = token_data.claims;

        // Re-check issuer and audience after decode.
        if claims.iss != self.config.issuer {
            tracing::warn!(
                "Issuer mismatch after validation: expected '{}', got '{}'",
                self.config.issuer,
                claims.iss
            );
            return Err(AuthError::InvalidToken);
        }
        if !claims.aud.contains(&self.config.audience) {
            tracing::warn!(
                "Audience mismatch after validation: expected '{}', got '{:?}'",
                self.config.audience,
                claims.aud
            );
            return Err(AuthError::InvalidToken);
        }

        let role = claims
            .role
            .parse()
            .map_err(|_| AuthError::UnknownRole(claims.role.clone()))?;

        // Email is required for actor attribution in activity events.
        let email = claims.email.ok_or_else(|| {
            tracing::warn!("Token missing email claim");
            AuthError::InvalidToken
        })?;

        let user_id = UserId::new(&claims.sub).map_err(|_| {
            tracing::warn!("Invalid user ID in token: {}", claims.sub);
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(user_id, role, email, claims.name))
    }
}

impl std::fmt::Debug for JwtTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenVerifier")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}
