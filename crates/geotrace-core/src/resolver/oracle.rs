//! Wire shape of the IP geolocation oracle

use serde::Deserialize;

use super::resolution::{
    LocationEstimate, Resolution, PASSIVE_ACCURACY, PASSIVE_CONFIDENCE, PASSIVE_METHOD,
};
use crate::location::UNKNOWN;

/// Oracle response body. Only `status` is guaranteed; everything else is
/// checked when mapping to a [`Resolution`].
#[derive(Debug, Clone, Deserialize)]
pub struct OracleResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub isp: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
}

impl OracleResponse {
    /// Map to the canonical resolution. `queried` is the identity we asked about.
    pub fn into_resolution(self, queried: &str) -> Resolution {
        if self.status != "success" {
            let message = self
                .message
                .unwrap_or_else(|| format!("Oracle reported status '{}'", self.status));
            return Resolution::failed(queried, message);
        }

        let (Some(latitude), Some(longitude)) = (self.lat, self.lon) else {
            return Resolution::failed(queried, "Oracle response missing coordinates");
        };

        let or_unknown = |v: Option<String>| v.unwrap_or_else(|| UNKNOWN.to_string());

        Resolution::Resolved(LocationEstimate {
            latitude,
            longitude,
            city: or_unknown(self.city),
            country: or_unknown(self.country),
            isp: or_unknown(self.isp),
            ip: self.query.unwrap_or_else(|| queried.to_string()),
            method: PASSIVE_METHOD.to_string(),
            accuracy: PASSIVE_ACCURACY.to_string(),
            confidence: PASSIVE_CONFIDENCE.to_string(),
        })
    }
}
