//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Authentication configuration (portal JWT verification)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Expected `iss` claim
    pub issuer: String,

    /// Expected `aud` claim
    pub audience: String,

    /// HMAC signing secret shared with the identity service
    pub secret: SecretString,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// In production, requires a secret of at least 32 bytes. Development
    /// allows shorter secrets for local setups.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.issuer.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH_ISSUER"));
        }
        if self.audience.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH_AUDIENCE"));
        }
        if self.secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH_SECRET"));
        }

        if *environment == Environment::Production && self.secret.expose_secret().len() < 32 {
            return Err(ValidationError::JwtSecretTooShort);
        }

        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: String::new(),
            audience: String::new(),
            secret: SecretString::new(String::new()),
        }
    }
}
