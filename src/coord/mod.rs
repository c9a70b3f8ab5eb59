//! Coordinates and great-circle distance
//!
//! This module handles:
//! - The coordinate type shared by location resolution and ranking
//! - The human-readable location string written to the location field
//! - Haversine distance between two coordinates

pub mod distance;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const LATITUDE_PREFIX: &str = "Latitude: ";
const LONGITUDE_PREFIX: &str = "Longitude: ";

/// A geographic coordinate (latitude, longitude) in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Create a new coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite numbers
    ///
    /// A coordinate failing this check must never reach distance computation.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !self.is_finite() {
            return Err(Error::InvalidCoordinates(format!(
                "({}, {}) is not a finite coordinate",
                self.lat, self.lng
            )));
        }
        if self.lat < -90.0 || self.lat > 90.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if self.lng < -180.0 || self.lng > 180.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lng
            )));
        }
        Ok(())
    }

    /// Parse the location field text back into a coordinate
    ///
    /// Strips the first `"Latitude: "` and `"Longitude: "` labels and splits on
    /// the first comma. Either half failing to parse as a finite number is an
    /// `InvalidLocationFormat`.
    pub fn parse_display(text: &str) -> Result<Self> {
        let stripped = text
            .replacen(LATITUDE_PREFIX, "", 1)
            .replacen(LONGITUDE_PREFIX, "", 1);

        let (lat_str, lng_str) = stripped
            .split_once(',')
            .ok_or_else(|| Error::InvalidLocationFormat(format!("missing comma in '{}'", text)))?;

        let lat = parse_component(lat_str, "latitude")?;
        let lng = parse_component(lng_str, "longitude")?;

        Ok(Self::new(lat, lng))
    }
}

fn parse_component(raw: &str, what: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::InvalidLocationFormat(format!("{} '{}' is not a number", what, raw.trim())))?;

    if !value.is_finite() {
        return Err(Error::InvalidLocationFormat(format!(
            "{} '{}' is not finite",
            what,
            raw.trim()
        )));
    }

    Ok(value)
}

/// Location field text: `Latitude: {lat}, Longitude: {lng}`
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}, {}{}", LATITUDE_PREFIX, self.lat, LONGITUDE_PREFIX, self.lng)
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_display(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_display_format() {
        let coord = Coordinate::new(40.7128, -74.006);
        assert_eq!(coord.to_string(), "Latitude: 40.7128, Longitude: -74.006");
    }

    #[test]
    fn test_display_parse_roundtrip() {
        let samples = [
            Coordinate::new(40.7128, -74.0060),
            Coordinate::new(-33.868820, 151.209296),
            Coordinate::new(0.0, 0.0),
            Coordinate::new(89.999999, -179.999999),
            Coordinate::new(1e-7, -2.5e-9),
        ];

        for coord in samples {
            let parsed = Coordinate::parse_display(&coord.to_string()).unwrap();
            assert_relative_eq!(parsed.lat, coord.lat);
            assert_relative_eq!(parsed.lng, coord.lng);
        }
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let coord: Coordinate = "Latitude:  12.5 ,  Longitude: 77.25 ".parse().unwrap();
        assert_eq!(coord, Coordinate::new(12.5, 77.25));
    }

    #[test]
    fn test_parse_bare_pair() {
        let coord = Coordinate::parse_display("12.5, 77.25").unwrap();
        assert_eq!(coord, Coordinate::new(12.5, 77.25));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for text in [
            "",
            "somewhere nice",
            "Latitude: abc, Longitude: 1.0",
            "Latitude: 1.0, Longitude: ",
            "Latitude: NaN, Longitude: 1.0",
            "Latitude: 1.0, Longitude: inf",
        ] {
            let err = Coordinate::parse_display(text).unwrap_err();
            assert!(
                matches!(err, Error::InvalidLocationFormat(_)),
                "expected InvalidLocationFormat for {:?}, got {:?}",
                text,
                err
            );
        }
    }

    #[test]
    fn test_is_finite() {
        assert!(Coordinate::new(1.0, 2.0).is_finite());
        assert!(!Coordinate::new(f64::NAN, 2.0).is_finite());
        assert!(!Coordinate::new(1.0, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_validate_ranges() {
        assert!(Coordinate::new(40.7128, -74.006).validate().is_ok());
        assert!(Coordinate::new(91.0, 0.0).validate().is_err());
        assert!(Coordinate::new(0.0, -181.0).validate().is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).validate().is_err());
    }
}
