//! Location resolution
//!
//! Obtains the user's current coordinate from a position capability and
//! classifies failures into the user-facing taxonomy.

pub mod fixed;
pub mod ip_location;

use crate::config::Config;
use crate::constants::position::{MAXIMUM_AGE_MS, TIMEOUT_MS};
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Options passed to a position capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Ask for the most accurate fix the capability can give
    pub high_accuracy: bool,
    /// Give up after this long without a response
    pub timeout: Duration,
    /// Reuse a previous fix only if it is at most this old
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_millis(TIMEOUT_MS),
            maximum_age: Duration::from_millis(MAXIMUM_AGE_MS),
        }
    }
}

/// A position reported by a capability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionFix {
    pub coords: Coordinate,
    /// When the fix was taken
    pub timestamp: DateTime<Utc>,
}

impl PositionFix {
    /// A fix taken now
    pub fn now(coords: Coordinate) -> Self {
        Self {
            coords,
            timestamp: Utc::now(),
        }
    }

    /// Whether this fix may be reused under `maximum_age`
    pub fn is_fresh(&self, maximum_age: Duration) -> bool {
        if maximum_age.is_zero() {
            return false;
        }
        let age = Utc::now().signed_duration_since(self.timestamp);
        match age.to_std() {
            Ok(age) => age <= maximum_age,
            // Timestamp in the future: clock skew, treat as fresh
            Err(_) => true,
        }
    }
}

/// Trait for position capabilities
///
/// Implementations report failures with the location variants of [`Error`]:
/// `PermissionDenied`, `PositionUnavailable`, `Timeout` or `UnknownError`.
pub trait PositionProvider: Send + Sync {
    /// Request the current position
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<PositionFix>> + Send;
}

/// Resolves the user's current coordinate
///
/// Holds no provider when the device has no position capability; every
/// `resolve` then fails with `CapabilityUnavailable`.
#[derive(Debug)]
pub struct LocationResolver<P> {
    provider: Option<P>,
    options: PositionOptions,
}

impl<P: PositionProvider> LocationResolver<P> {
    /// Create a resolver backed by `provider` with the fixed request options
    pub fn new(provider: P) -> Self {
        Self {
            provider: Some(provider),
            options: PositionOptions::default(),
        }
    }

    /// Create a resolver for a device without a position capability
    pub fn unavailable() -> Self {
        Self {
            provider: None,
            options: PositionOptions::default(),
        }
    }

    /// Create a resolver from an optional capability
    pub fn from_capability(provider: Option<P>) -> Self {
        Self {
            provider,
            options: PositionOptions::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_options(provider: P, options: PositionOptions) -> Self {
        Self {
            provider: Some(provider),
            options,
        }
    }

    /// Whether a position capability is present
    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Resolve the current coordinate
    ///
    /// Suspends until the capability answers or the timeout elapses.
    pub async fn resolve(&self) -> Result<Coordinate> {
        let provider = self.provider.as_ref().ok_or(Error::CapabilityUnavailable)?;

        debug!(
            "Requesting position (high_accuracy={}, timeout={:?}, maximum_age={:?})",
            self.options.high_accuracy, self.options.timeout, self.options.maximum_age
        );

        let fix = match tokio::time::timeout(
            self.options.timeout,
            provider.current_position(&self.options),
        )
        .await
        {
            Ok(Ok(fix)) => fix,
            Ok(Err(e)) => {
                warn!("Geolocation error: {}", e);
                return Err(classify(e));
            }
            Err(_) => {
                warn!("Geolocation request timed out after {:?}", self.options.timeout);
                return Err(Error::Timeout);
            }
        };

        if !fix.coords.is_finite() {
            warn!("Position capability returned a non-finite fix: {:?}", fix.coords);
            return Err(Error::PositionUnavailable(
                "capability returned a non-finite coordinate".to_string(),
            ));
        }

        info!("Resolved position {}", fix.coords);
        Ok(fix.coords)
    }
}

/// Fold any error outside the location taxonomy into `UnknownError`
fn classify(err: Error) -> Error {
    match err {
        Error::CapabilityUnavailable
        | Error::PermissionDenied
        | Error::PositionUnavailable(_)
        | Error::Timeout
        | Error::UnknownError(_) => err,
        other => Error::UnknownError(other.to_string()),
    }
}

/// Position capabilities selectable from the CLI and config
#[derive(Debug)]
pub enum DevicePosition {
    /// IP geolocation
    Ip(ip_location::IpPositionProvider),
    /// A coordinate supplied by the user
    Fixed(fixed::FixedPositionProvider),
}

impl PositionProvider for DevicePosition {
    async fn current_position(&self, options: &PositionOptions) -> Result<PositionFix> {
        match self {
            Self::Ip(p) => p.current_position(options).await,
            Self::Fixed(p) => p.current_position(options).await,
        }
    }
}

/// Pick the position capability for this run
///
/// An explicit coordinate wins; otherwise `location.provider` decides.
/// Returns `None` when no capability is configured.
pub fn get_position_provider(config: &Config, fixed: Option<Coordinate>) -> Option<DevicePosition> {
    if let Some(coords) = fixed {
        return Some(DevicePosition::Fixed(fixed::FixedPositionProvider::new(coords)));
    }

    match config.location.provider.as_str() {
        "ip" => Some(DevicePosition::Ip(ip_location::IpPositionProvider::new())),
        _ => None,
    }
}
