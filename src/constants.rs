//! Centralized constants for the hospital-finder crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Mean Earth radius in kilometers
    pub const EARTH_RADIUS_KM: f64 = 6371.0;
}

/// External API endpoints
pub mod api {
    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";

    /// Path of the nearest-hospital lookup on the facility service
    pub const FIND_NEAREST_HOSPITALS_PATH: &str = "/find_nearest_hospitals";
}

/// Position request options
pub mod position {
    /// Give up on a position request after this many milliseconds
    pub const TIMEOUT_MS: u64 = 30_000;

    /// Maximum age of a reusable position fix (0 = always fetch fresh)
    pub const MAXIMUM_AGE_MS: u64 = 0;
}

/// Labels shown on display surfaces
pub mod labels {
    /// Location trigger label when idle
    pub const LOCATE_IDLE: &str = "Enable Precise Location";

    /// Location trigger label while a request is in flight
    pub const LOCATE_BUSY: &str = "Fetching location...";

    /// Label of the placeholder entry heading every selection list
    pub const CHOOSE_HOSPITAL: &str = "Choose a hospital";

    /// Notification after a position was resolved
    pub const LOCATION_OK: &str = "Location retrieved successfully!";

    /// Notification after the hospital list was rebuilt
    pub const HOSPITALS_OK: &str = "Hospital list updated successfully!";
}

/// Cache settings
pub mod cache {
    /// IP position cache file name
    pub const IP_POSITION_CACHE_FILE: &str = "ip_position_cache.json";
}
