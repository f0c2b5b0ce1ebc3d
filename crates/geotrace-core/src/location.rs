//! Location event data model

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Format of the server-assigned insert timestamp (local time, second precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder for enrichment fields the caller did not supply
pub const UNKNOWN: &str = "Unknown";

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// A persisted location event. Immutable once inserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEvent {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// Provenance tag (how the location was obtained)
    pub method: String,
    pub accuracy: String,
    pub city: String,
    pub country: String,
    pub ip: String,
    pub timestamp: String,
}

/// The caller-suppliable part of a location event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEventInput {
    pub latitude: f64,
    pub longitude: f64,
    pub method: String,
    pub accuracy: String,
    #[serde(default = "unknown")]
    pub city: String,
    #[serde(default = "unknown")]
    pub country: String,
    #[serde(default = "unknown")]
    pub ip: String,
}

impl LocationEventInput {
    /// Create an input with the required fields and unknown enrichment
    pub fn new(
        latitude: f64,
        longitude: f64,
        method: impl Into<String>,
        accuracy: impl Into<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            method: method.into(),
            accuracy: accuracy.into(),
            city: unknown(),
            country: unknown(),
            ip: unknown(),
        }
    }

    /// Check the input can be stored. Coordinates are not range-checked.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.latitude.is_finite() {
            return Err(ValidationError::NonFinite { field: "latitude" });
        }
        if !self.longitude.is_finite() {
            return Err(ValidationError::NonFinite { field: "longitude" });
        }
        Ok(())
    }

    /// Attach the server-assigned timestamp
    pub fn stamp(self, timestamp: impl Into<String>) -> NewLocationEvent {
        NewLocationEvent {
            input: self,
            timestamp: timestamp.into(),
        }
    }
}

/// A validated input with its insert timestamp, ready for the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocationEvent {
    pub input: LocationEventInput,
    pub timestamp: String,
}
