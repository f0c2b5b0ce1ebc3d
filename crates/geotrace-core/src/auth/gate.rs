//! Bearer token verification

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use super::token::{Claims, Identity};
use crate::config::AuthConfig;
use crate::error::AuthzError;

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let header = header?.trim();
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Verifies signature and expiry of presented tokens
#[derive(Clone)]
pub struct AccessGate {
    key: DecodingKey,
    validation: Validation,
}

impl AccessGate {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Accept the token and return its identity, or say why it was refused
    pub fn authorize(&self, presented: Option<&str>) -> Result<Identity, AuthzError> {
        let token = presented
            .filter(|t| !t.is_empty())
            .ok_or(AuthzError::MissingCredential)?;

        let data = jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthzError::ExpiredToken,
                _ => AuthzError::InvalidToken(e.to_string()),
            },
        )?;

        Ok(Identity {
            subject: data.claims.sub,
        })
    }
}
