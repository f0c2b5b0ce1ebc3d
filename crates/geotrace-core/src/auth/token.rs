//! Token payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scheme reported to clients alongside the token
pub const TOKEN_TYPE: &str = "bearer";

/// Signed claims carried inside an access token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated identity
    pub sub: String,
    /// Issued-at, seconds since the epoch
    pub iat: i64,
    /// Absolute expiry, seconds since the epoch
    pub exp: i64,
}

/// A freshly issued token. Held by the caller only.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Identity recovered from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
}
