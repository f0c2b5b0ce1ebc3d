//! Canonical output of passive IP resolution

use serde::{Deserialize, Serialize};

use crate::location::{LocationEventInput, UNKNOWN};

/// Provenance label for every network-inferred location
pub const PASSIVE_METHOD: &str = "network-based inference";

/// Expected error radius of IP geolocation
pub const PASSIVE_ACCURACY: &str = "approximate (city-level, ~5-50 km)";

/// Confidence tag for a successful IP lookup
pub const PASSIVE_CONFIDENCE: &str = "medium";

/// Confidence tag for a failed lookup
pub const FAILED_CONFIDENCE: &str = "none";

/// City marker for a failed lookup
pub const FAILED_CITY: &str = "Lookup failed";

/// Outcome of a single resolution attempt.
///
/// The `status` tag carries the success flag explicitly, so a failure is never
/// confused with a genuine reading at (0, 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Resolution {
    #[serde(rename = "success")]
    Resolved(LocationEstimate),
    #[serde(rename = "fail")]
    Failed(ResolutionFailure),
}

impl Resolution {
    pub(crate) fn failed(ip: impl Into<String>, message: impl Into<String>) -> Self {
        Resolution::Failed(ResolutionFailure {
            latitude: 0.0,
            longitude: 0.0,
            city: FAILED_CITY.to_string(),
            country: UNKNOWN.to_string(),
            ip: ip.into(),
            method: PASSIVE_METHOD.to_string(),
            accuracy: "unavailable".to_string(),
            confidence: FAILED_CONFIDENCE.to_string(),
            message: message.into(),
        })
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    pub fn estimate(&self) -> Option<&LocationEstimate> {
        match self {
            Resolution::Resolved(estimate) => Some(estimate),
            Resolution::Failed(_) => None,
        }
    }
}

/// A location inferred from network metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEstimate {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub country: String,
    pub isp: String,
    /// Address the oracle resolved (the egress address for self lookups)
    pub ip: String,
    pub method: String,
    pub accuracy: String,
    pub confidence: String,
}

/// Degraded result returned when the oracle cannot be used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionFailure {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub country: String,
    /// The identity originally queried
    pub ip: String,
    pub method: String,
    pub accuracy: String,
    pub confidence: String,
    pub message: String,
}

impl From<&LocationEstimate> for LocationEventInput {
    fn from(estimate: &LocationEstimate) -> Self {
        Self {
            latitude: estimate.latitude,
            longitude: estimate.longitude,
            method: estimate.method.clone(),
            accuracy: estimate.accuracy.clone(),
            city: estimate.city.clone(),
            country: estimate.country.clone(),
            ip: estimate.ip.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_shape() {
        let resolution = Resolution::failed("198.51.100.4", "connection refused");
        assert!(!resolution.is_resolved());

        let json = serde_json::to_value(&resolution).unwrap();
        assert_eq!(json["status"], "fail");
        assert_eq!(json["latitude"], 0.0);
        assert_eq!(json["longitude"], 0.0);
        assert_eq!(json["ip"], "198.51.100.4");
        assert_eq!(json["city"], FAILED_CITY);
        assert_eq!(json["confidence"], FAILED_CONFIDENCE);
        assert_eq!(json["message"], "connection refused");
    }

    #[test]
    fn test_estimate_converts_to_ingestion_input() {
        let estimate = LocationEstimate {
            latitude: 48.85,
            longitude: 2.35,
            city: "Paris".to_string(),
            country: "France".to_string(),
            isp: "Example ISP".to_string(),
            ip: "192.0.2.10".to_string(),
            method: PASSIVE_METHOD.to_string(),
            accuracy: PASSIVE_ACCURACY.to_string(),
            confidence: PASSIVE_CONFIDENCE.to_string(),
        };

        let input = LocationEventInput::from(&estimate);
        assert_eq!(input.method, PASSIVE_METHOD);
        assert_eq!(input.city, "Paris");
        assert_eq!(input.ip, "192.0.2.10");
        assert!(input.validate().is_ok());
    }
}
