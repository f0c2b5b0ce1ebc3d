//! Persistence layer for location events
//!
//! Provides an append-only SQLite store. The store holds no connection: each
//! operation opens its own, runs a single statement and releases it.

mod event_store;
mod schema;

pub use event_store::EventStore;
pub use schema::Schema;
