//! Ingestion of location events into the store

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::location::{LocationEventInput, TIMESTAMP_FORMAT};
use crate::store::EventStore;

/// Result of a successful ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub status: String,
    pub message: String,
    /// Id the store assigned to the new event
    pub id: i64,
}

/// Validates location events, stamps them and writes them to the store
#[derive(Debug, Clone)]
pub struct IngestionService {
    store: EventStore,
}

impl IngestionService {
    pub fn new(store: EventStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// Record one event. Appends exactly one row on success and none on error.
    pub fn record(&self, input: LocationEventInput) -> Result<Acknowledgement> {
        input.validate()?;

        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        let method = input.method.clone();
        let id = self.store.append(&input.stamp(timestamp)).map_err(|e| {
            tracing::error!("Failed to record location event: {}", e);
            e
        })?;

        tracing::info!("Recorded location event {} ({})", id, method);
        Ok(Acknowledgement {
            status: "success".to_string(),
            message: "Target data recorded.".to_string(),
            id,
        })
    }
}
