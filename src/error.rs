//! Error types for hospital-finder

use thiserror::Error;

/// Main error type for hospital-finder operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Geolocation capability is not available")]
    CapabilityUnavailable,

    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("Location request timed out")]
    Timeout,

    #[error("Unknown geolocation error: {0}")]
    UnknownError(String),

    #[error("No resolved location to search from")]
    NoValidCoordinates,

    #[error("Invalid location format: {0}")]
    InvalidLocationFormat(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),

    #[error("Facility lookup failed: {0}")]
    NetworkOrParseFailure(String),

    #[error("No hospitals found within the selected radius")]
    EmptyResult,

    #[error("A request is already in progress")]
    RequestInFlight,

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// One-line notification text shown to the user for this failure
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::CapabilityUnavailable => "Geolocation is not supported on this device.",
            Self::PermissionDenied => "Permission denied. Please allow location access.",
            Self::PositionUnavailable(_) => {
                "Location unavailable. Please check your GPS or internet connection."
            }
            Self::Timeout => {
                "Location request timed out. Please ensure that your device has a GPS signal and try again."
            }
            Self::UnknownError(_) => {
                "An unknown error occurred while retrieving location. Please try again."
            }
            Self::NoValidCoordinates => "Please enable precise location first.",
            Self::InvalidLocationFormat(_) | Self::InvalidCoordinates(_) => {
                "Invalid location format. Please try again."
            }
            Self::InvalidRadius(_) => "Please enter a valid search radius.",
            Self::NetworkOrParseFailure(_) | Self::Http(_) | Self::Json(_) => {
                "Failed to retrieve hospitals. Please try again."
            }
            Self::EmptyResult => "No hospitals found within the selected radius.",
            Self::RequestInFlight => "A request is already in progress.",
            Self::Config(_) | Self::Io(_) => "Something went wrong. Please try again.",
        }
    }

    /// Whether the page already told the user about this failure
    ///
    /// Location and ranking failures go through the page notifier; ambient
    /// failures (config, IO, raw transport) surface only to the caller.
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            Self::InvalidCoordinates(_)
                | Self::Config(_)
                | Self::Io(_)
                | Self::Http(_)
                | Self::Json(_)
        )
    }
}

/// Result type alias for hospital-finder operations
pub type Result<T> = std::result::Result<T, Error>;
