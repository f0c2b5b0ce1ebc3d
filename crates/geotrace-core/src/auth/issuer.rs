//! Login against the fixed operator identity

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header};

use super::token::{AccessToken, Claims};
use crate::config::AuthConfig;
use crate::error::AuthError;

/// Issues HS256 access tokens to the configured operator
#[derive(Clone)]
pub struct CredentialIssuer {
    username: String,
    password: String,
    key: EncodingKey,
    ttl: Duration,
}

impl CredentialIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            key: EncodingKey::from_secret(config.secret.as_bytes()),
            ttl: Duration::minutes(config.token_ttl_minutes),
        }
    }

    /// Check the credentials and issue a token valid from now
    pub fn authenticate(&self, username: &str, password: &str) -> Result<AccessToken, AuthError> {
        if username != self.username || password != self.password {
            tracing::warn!("Rejected login for user '{}'", username);
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_at(username, Utc::now())?;
        tracing::info!("Issued access token for '{}' until {}", username, token.expires_at);
        Ok(token)
    }

    /// Sign a token for `subject` as if issued at `issued_at`
    pub fn issue_at(&self, subject: &str, issued_at: DateTime<Utc>) -> Result<AccessToken, AuthError> {
        let expires_at = issued_at + self.ttl;
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.key)
            .map_err(|e| AuthError::TokenIssue(e.to_string()))?;

        Ok(AccessToken {
            token,
            subject: subject.to_string(),
            issued_at,
            expires_at,
        })
    }
}
