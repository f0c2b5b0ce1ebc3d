//! Error types for geotrace-core

use thiserror::Error;

/// Result type alias for geotrace operations
pub type Result<T> = std::result::Result<T, GeotraceError>;

/// Main error type for geotrace operations
#[derive(Error, Debug)]
pub enum GeotraceError {
    /// Ingestion input rejected before reaching the store
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Store unavailable or write failed
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Login rejected
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Bearer token rejected
    #[error("Authorization error: {0}")]
    Authz(#[from] AuthzError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Ingestion validation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Coordinate is NaN or infinite
    #[error("Field '{field}' must be a finite number")]
    NonFinite { field: &'static str },
}

/// Persistence-specific errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(String),
}

/// Credential errors raised at login
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Username or password did not match the operator identity
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Token could not be signed
    #[error("Token issue failed: {0}")]
    TokenIssue(String),
}

/// Bearer token rejections, one per failure state of the gate
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthzError {
    /// No bearer token was presented
    #[error("Not authenticated")]
    MissingCredential,

    /// Token is malformed or its signature does not verify
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token verified but its expiry has passed
    #[error("Token has expired")]
    ExpiredToken,
}

impl AuthzError {
    /// Stable machine-readable name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            AuthzError::MissingCredential => "missing_credential",
            AuthzError::InvalidToken(_) => "invalid_token",
            AuthzError::ExpiredToken => "expired_token",
        }
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(String),

    /// Config file is not valid TOML for the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Oracle HTTP client could not be built from the settings
    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        PersistenceError::Database(err.to_string())
    }
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::Io(err.to_string())
    }
}

impl From<rusqlite::Error> for GeotraceError {
    fn from(err: rusqlite::Error) -> Self {
        GeotraceError::Persistence(PersistenceError::from(err))
    }
}
