//! Passive location inference from network identity
//!
//! Best-effort fallback for when device positioning is denied: one bounded
//! oracle lookup, no retries, and failures degrade to a zeroed
//! [`ResolutionFailure`] rather than an error.

mod oracle;
mod resolution;

pub use oracle::OracleResponse;
pub use resolution::{
    LocationEstimate, Resolution, ResolutionFailure, FAILED_CITY, FAILED_CONFIDENCE,
    PASSIVE_ACCURACY, PASSIVE_CONFIDENCE, PASSIVE_METHOD,
};

use std::net::IpAddr;
use std::time::Duration;

use reqwest::Client;

use crate::config::OracleConfig;
use crate::error::ConfigError;
use crate::location::UNKNOWN;

/// Pick the address to geolocate: the first forwarded-for value when it is
/// a valid address, otherwise the transport peer.
pub fn effective_identity(forwarded_for: Option<&str>, peer: Option<IpAddr>) -> Option<IpAddr> {
    let forwarded = forwarded_for
        .and_then(|header| header.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    if let Some(value) = forwarded {
        match value.parse::<IpAddr>() {
            Ok(ip) => return Some(ip),
            Err(_) => tracing::warn!("Ignoring unparseable forwarded address: {}", value),
        }
    }

    peer
}

/// Client for the IP geolocation oracle
#[derive(Debug, Clone)]
pub struct GeoResolver {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl GeoResolver {
    /// Create a resolver whose lookups are bounded by the configured timeout
    pub fn new(config: &OracleConfig) -> Result<Self, ConfigError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Build the lookup URL. Loopback and unknown callers get the oracle's
    /// self lookup, which resolves the server's own egress address.
    pub fn lookup_url(&self, identity: Option<IpAddr>) -> String {
        match identity {
            Some(ip) if !ip.is_loopback() => format!("{}/json/{}", self.base_url, ip),
            _ => format!("{}/json/", self.base_url),
        }
    }

    /// Resolve the identity to a location. Never fails; see [`Resolution`].
    pub async fn resolve(&self, identity: Option<IpAddr>) -> Resolution {
        let queried = identity
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string());
        let url = self.lookup_url(identity);
        tracing::debug!("Resolving {} via {}", queried, url);

        let resolution = match self.query(&url).await {
            Ok(response) => response.into_resolution(&queried),
            Err(message) => Resolution::failed(&queried, message),
        };

        if let Resolution::Failed(failure) = &resolution {
            tracing::warn!("IP resolution failed for {}: {}", queried, failure.message);
        }
        resolution
    }

    async fn query(&self, url: &str) -> Result<OracleResponse, String> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                format!("Oracle timed out after {} ms", self.timeout.as_millis())
            } else {
                format!("Oracle request failed: {}", e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Oracle returned HTTP {}", status.as_u16()));
        }

        response.json::<OracleResponse>().await.map_err(|e| {
            if e.is_timeout() {
                format!("Oracle timed out after {} ms", self.timeout.as_millis())
            } else {
                format!("Invalid oracle response: {}", e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    /// Serve `body` for every path after `delay`, recording requested paths
    async fn spawn_oracle(
        body: serde_json::Value,
        delay: Duration,
    ) -> (String, Arc<Mutex<Vec<String>>>) {
        let paths = Arc::new(Mutex::new(Vec::new()));
        let recorded = paths.clone();

        let app = axum::Router::new().fallback(move |uri: axum::http::Uri| {
            let recorded = recorded.clone();
            let body = body.clone();
            async move {
                recorded.lock().unwrap().push(uri.path().to_string());
                tokio::time::sleep(delay).await;
                axum::Json(body)
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), paths)
    }

    fn resolver(base_url: &str, timeout_ms: u64) -> GeoResolver {
        GeoResolver::new(&OracleConfig {
            base_url: base_url.to_string(),
            timeout_ms,
        })
        .unwrap()
    }

    fn success_body() -> serde_json::Value {
        serde_json::json!({
            "status": "success",
            "lat": 51.5,
            "lon": -0.12,
            "city": "London",
            "country": "United Kingdom",
            "isp": "Example Transit",
            "query": "198.51.100.23"
        })
    }

    #[test]
    fn test_forwarded_header_preferred() {
        let peer = Some(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2)));
        let ip = effective_identity(Some("203.0.113.5, 10.0.0.1"), peer);
        assert_eq!(ip, Some("203.0.113.5".parse().unwrap()));
    }

    #[test]
    fn test_peer_used_without_header() {
        let peer = Some(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 8)));
        assert_eq!(effective_identity(None, peer), peer);
        assert_eq!(effective_identity(Some("  "), peer), peer);
    }

    #[test]
    fn test_garbage_header_falls_back_to_peer() {
        let peer = Some(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 8)));
        assert_eq!(effective_identity(Some("../admin"), peer), peer);
    }

    #[test]
    fn test_lookup_url_for_loopback_has_no_target() {
        let resolver = resolver("http://oracle.test/", 5_000);

        assert_eq!(
            resolver.lookup_url(Some(IpAddr::V4(Ipv4Addr::LOCALHOST))),
            "http://oracle.test/json/"
        );
        assert_eq!(
            resolver.lookup_url(Some(IpAddr::V6(Ipv6Addr::LOCALHOST))),
            "http://oracle.test/json/"
        );
        assert_eq!(resolver.lookup_url(None), "http://oracle.test/json/");
        assert_eq!(
            resolver.lookup_url(Some("8.8.8.8".parse().unwrap())),
            "http://oracle.test/json/8.8.8.8"
        );
    }

    #[tokio::test]
    async fn test_resolve_success() {
        let (base_url, paths) = spawn_oracle(success_body(), Duration::ZERO).await;
        let resolver = resolver(&base_url, 5_000);

        let resolution = resolver.resolve(Some("198.51.100.23".parse().unwrap())).await;

        let estimate = resolution.estimate().unwrap();
        assert_eq!(estimate.city, "London");
        assert_eq!(estimate.confidence, PASSIVE_CONFIDENCE);
        assert_eq!(estimate.method, PASSIVE_METHOD);
        assert_eq!(*paths.lock().unwrap(), vec!["/json/198.51.100.23".to_string()]);
    }

    #[tokio::test]
    async fn test_loopback_never_forwarded_to_oracle() {
        let (base_url, paths) = spawn_oracle(success_body(), Duration::ZERO).await;
        let resolver = resolver(&base_url, 5_000);

        resolver.resolve(Some(IpAddr::V4(Ipv4Addr::LOCALHOST))).await;
        resolver.resolve(Some(IpAddr::V6(Ipv6Addr::LOCALHOST))).await;

        let paths = paths.lock().unwrap();
        assert_eq!(paths.len(), 2);
        for path in paths.iter() {
            assert_eq!(path, "/json/");
            assert!(!path.contains("127.0.0.1"));
            assert!(!path.contains("::1"));
        }
    }

    #[tokio::test]
    async fn test_oracle_fail_status() {
        let body = serde_json::json!({"status": "fail", "message": "reserved range", "query": "10.1.1.1"});
        let (base_url, _paths) = spawn_oracle(body, Duration::ZERO).await;
        let resolver = resolver(&base_url, 5_000);

        match resolver.resolve(Some("10.1.1.1".parse().unwrap())).await {
            Resolution::Failed(failure) => {
                assert_eq!(failure.ip, "10.1.1.1");
                assert_eq!(failure.latitude, 0.0);
                assert_eq!(failure.longitude, 0.0);
                assert_eq!(failure.message, "reserved range");
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_oracle_degrades_within_timeout() {
        let (base_url, _paths) = spawn_oracle(success_body(), Duration::from_secs(5)).await;
        let resolver = resolver(&base_url, 200);

        let started = Instant::now();
        let resolution = resolver.resolve(Some("198.51.100.23".parse().unwrap())).await;
        let elapsed = started.elapsed();

        assert!(elapsed < Duration::from_secs(3), "took {:?}", elapsed);
        match resolution {
            Resolution::Failed(failure) => {
                assert_eq!(failure.latitude, 0.0);
                assert_eq!(failure.longitude, 0.0);
                assert_eq!(failure.city, FAILED_CITY);
                assert_eq!(failure.ip, "198.51.100.23");
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_oracle_degrades() {
        let resolver = resolver("http://127.0.0.1:1", 1_000);
        let resolution = resolver.resolve(Some("192.0.2.44".parse().unwrap())).await;
        assert!(!resolution.is_resolved());
    }
}
