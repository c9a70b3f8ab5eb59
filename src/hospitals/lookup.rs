//! Facility-lookup service client
//!
//! Talks to `GET /find_nearest_hospitals?lat=..&lng=..&radius=..`.

use crate::constants::api::FIND_NEAREST_HOSPITALS_PATH;
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Body returned by the lookup service
///
/// `hospitals` may be absent or null; elements are kept as raw JSON so one
/// malformed record cannot fail the whole response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub hospitals: Option<Vec<serde_json::Value>>,
}

/// Trait for facility-lookup backends
pub trait FacilityLookup: Send + Sync {
    /// Fetch candidate facilities around `origin`
    ///
    /// `radius` is forwarded exactly as given.
    fn find_nearest(
        &self,
        origin: Coordinate,
        radius: u32,
    ) -> impl Future<Output = Result<LookupResponse>> + Send;
}

/// HTTP client for the facility-lookup service
#[derive(Debug, Clone)]
pub struct HttpFacilityLookup {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFacilityLookup {
    /// Create a client for the service rooted at `base_url`
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hospital-finder/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Full URL of the lookup endpoint
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            FIND_NEAREST_HOSPITALS_PATH
        )
    }
}

impl FacilityLookup for HttpFacilityLookup {
    async fn find_nearest(&self, origin: Coordinate, radius: u32) -> Result<LookupResponse> {
        let url = self.endpoint();
        debug!(
            "GET {}?lat={}&lng={}&radius={}",
            url, origin.lat, origin.lng, radius
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", origin.lat.to_string()),
                ("lng", origin.lng.to_string()),
                ("radius", radius.to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::NetworkOrParseFailure(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::NetworkOrParseFailure(format!(
                "lookup service returned status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::NetworkOrParseFailure(format!("failed to parse response: {}", e)))
    }
}
