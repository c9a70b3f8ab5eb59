//! IP-based geolocation
//!
//! Uses ip-api.com as a coarse position capability, with a file cache that is
//! only consulted when the request options allow reusing an older fix.

use crate::constants::api::IP_API_URL;
use crate::constants::cache::IP_POSITION_CACHE_FILE;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::geo::{PositionFix, PositionOptions, PositionProvider};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// IP position capability with caching
#[derive(Debug)]
pub struct IpPositionProvider {
    client: reqwest::Client,
    endpoint: String,
    cache_path: Option<PathBuf>,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

impl IpPositionProvider {
    /// Create an IP provider with the default cache path
    pub fn new() -> Self {
        let cache_path = dirs::cache_dir()
            .map(|p| p.join("hospital-finder").join(IP_POSITION_CACHE_FILE));

        Self {
            client: reqwest::Client::new(),
            endpoint: IP_API_URL.to_string(),
            cache_path,
        }
    }

    /// Create an IP provider with a specific cache path
    pub fn with_cache_path(cache_path: PathBuf) -> Self {
        Self {
            cache_path: Some(cache_path),
            ..Self::without_cache()
        }
    }

    /// Create an IP provider without caching
    pub fn without_cache() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: IP_API_URL.to_string(),
            cache_path: None,
        }
    }

    /// Point the provider at a different ip-api compatible endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Fetch a fresh fix from ip-api.com
    async fn fetch_position(&self, options: &PositionOptions) -> Result<PositionFix> {
        debug!("Requesting IP position from {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout
                } else {
                    Error::PositionUnavailable(format!("IP location request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN || status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::PermissionDenied);
        }
        if !status.is_success() {
            return Err(Error::PositionUnavailable(format!(
                "IP location API returned status: {}",
                status
            )));
        }

        let data: IpApiResponse = response.json().await.map_err(|e| {
            Error::UnknownError(format!("Failed to parse IP location response: {}", e))
        })?;

        if data.status != "success" {
            return Err(Error::PositionUnavailable(format!(
                "IP location lookup failed: {}",
                data.message.unwrap_or_else(|| "no reason given".to_string())
            )));
        }

        let lat = data
            .lat
            .ok_or_else(|| Error::PositionUnavailable("No latitude in response".to_string()))?;
        let lng = data
            .lon
            .ok_or_else(|| Error::PositionUnavailable("No longitude in response".to_string()))?;

        Ok(PositionFix::now(Coordinate::new(lat, lng)))
    }

    /// Load the cached fix if it is young enough
    fn load_cache(&self, options: &PositionOptions) -> Option<PositionFix> {
        let cache_path = self.cache_path.as_ref()?;

        if !cache_path.exists() {
            return None;
        }

        let content = fs::read_to_string(cache_path).ok()?;
        let cached: PositionFix = serde_json::from_str(&content).ok()?;

        cached.is_fresh(options.maximum_age).then_some(cached)
    }

    /// Save a fix to the cache
    fn save_cache(&self, fix: &PositionFix) {
        let Some(cache_path) = &self.cache_path else {
            return;
        };

        if let Some(parent) = cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        if let Ok(content) = serde_json::to_string_pretty(fix) {
            let _ = fs::write(cache_path, content);
        }
    }

    /// Clear the cache
    pub fn clear_cache(&self) {
        if let Some(cache_path) = &self.cache_path {
            let _ = fs::remove_file(cache_path);
        }
    }
}

impl Default for IpPositionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionProvider for IpPositionProvider {
    async fn current_position(&self, options: &PositionOptions) -> Result<PositionFix> {
        if let Some(cached) = self.load_cache(options) {
            debug!("Reusing cached IP position from {}", cached.timestamp);
            return Ok(cached);
        }

        let fix = self.fetch_position(options).await?;
        self.save_cache(&fix);

        Ok(fix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_provider_creation() {
        let provider = IpPositionProvider::new();
        assert!(provider.cache_path.is_some());

        let provider = IpPositionProvider::without_cache();
        assert!(provider.cache_path.is_none());
    }

    #[test]
    fn test_cache_respects_maximum_age() {
        let temp_dir = TempDir::new().unwrap();
        let provider = IpPositionProvider::with_cache_path(temp_dir.path().join("fix.json"));

        let reuse = PositionOptions {
            maximum_age: Duration::from_secs(3600),
            ..PositionOptions::default()
        };

        assert!(provider.load_cache(&reuse).is_none());

        provider.save_cache(&PositionFix::now(Coordinate::new(40.7128, -74.006)));

        let loaded = provider.load_cache(&reuse).unwrap();
        assert_eq!(loaded.coords, Coordinate::new(40.7128, -74.006));

        // Default options never reuse a cached fix
        assert!(provider.load_cache(&PositionOptions::default()).is_none());

        provider.clear_cache();
        assert!(provider.load_cache(&reuse).is_none());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "lat": 51.5074,
                "lon": -0.1278,
                "city": "London"
            })))
            .mount(&server)
            .await;

        let provider = IpPositionProvider::without_cache().with_endpoint(server.uri());
        let fix = provider
            .current_position(&PositionOptions::default())
            .await
            .unwrap();

        assert_eq!(fix.coords, Coordinate::new(51.5074, -0.1278));
    }

    #[tokio::test]
    async fn test_fetch_failure_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "fail",
                "message": "private range"
            })))
            .mount(&server)
            .await;

        let provider = IpPositionProvider::without_cache().with_endpoint(server.uri());
        let err = provider
            .current_position(&PositionOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::PositionUnavailable(_)));
    }

    #[tokio::test]
    async fn test_forbidden_is_permission_denied() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let provider = IpPositionProvider::without_cache().with_endpoint(server.uri());
        let err = provider
            .current_position(&PositionOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::PermissionDenied));
    }
}
