//! Geotrace Core - location resolution and ingestion
//!
//! This crate provides the decision logic behind the geotrace service:
//!
//! - **Resolver**: passive IP geolocation with a bounded oracle lookup and explicit failure results
//! - **Store**: append-only SQLite log of location events, newest first on read
//! - **Ingest**: validation, server-side timestamping and write-through to the store
//! - **Auth**: fixed operator login issuing signed tokens, and the gate that verifies them
//! - **Config**: one configuration struct, built at startup and injected everywhere
//!
//! # Flow
//!
//! ```text
//! device fix ─────────────┐
//!                         ├─→ IngestionService ─→ EventStore
//! GeoResolver (IP) ───────┘                          │
//!                                                    ↓
//! CredentialIssuer ─→ token ─→ AccessGate ─→ EventStore::list_all
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod ingest;
pub mod location;
pub mod resolver;
pub mod store;

pub use auth::{bearer_token, AccessGate, AccessToken, CredentialIssuer, Identity, TOKEN_TYPE};
pub use config::{AuthConfig, GeotraceConfig, OracleConfig, ServerConfig, StoreConfig};
pub use error::{
    AuthError, AuthzError, ConfigError, GeotraceError, PersistenceError, Result, ValidationError,
};
pub use ingest::{Acknowledgement, IngestionService};
pub use location::{LocationEvent, LocationEventInput, NewLocationEvent};
pub use resolver::{effective_identity, GeoResolver, LocationEstimate, Resolution, ResolutionFailure};
pub use store::{EventStore, Schema};
