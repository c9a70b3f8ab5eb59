//! Nearest-hospital ranking
//!
//! Requests candidate facilities around an origin, annotates each with its
//! Haversine distance and builds the selection list shown to the user.
//! Entries keep the order the service returned them in.

pub mod lookup;

use crate::constants::labels::CHOOSE_HOSPITAL;
use crate::coord::distance::{format_km, haversine_km};
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use lookup::{FacilityLookup, LookupResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Address shown when the service sends none
const MISSING_ADDRESS: &str = "N/A";

/// A hospital record from the lookup service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Facility record as it arrives on the wire
///
/// Every field stays untyped. Coordinates accept numbers and numeric
/// strings, anything else marks the record invalid; name and address are
/// rendered whatever their JSON type.
#[derive(Debug, Deserialize)]
struct RawFacility {
    #[serde(default)]
    name: Option<Value>,
    #[serde(default)]
    address: Option<Value>,
    #[serde(default)]
    latitude: Option<Value>,
    #[serde(default)]
    longitude: Option<Value>,
}

/// Read a coordinate component, accepting JSON numbers and numeric strings
fn coerce_degrees(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) if !s.trim().is_empty() => s.trim().parse().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Render a text field; `None` for null or missing
fn coerce_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

impl Facility {
    /// Decode one element of the `hospitals` array
    ///
    /// Returns `None` for records that are not objects or whose latitude or
    /// longitude is not a finite number.
    pub fn from_json(value: &Value) -> Option<Self> {
        let raw = RawFacility::deserialize(value).ok()?;

        let latitude = coerce_degrees(raw.latitude.as_ref())?;
        let longitude = coerce_degrees(raw.longitude.as_ref())?;

        Some(Self {
            name: coerce_text(raw.name).unwrap_or_default(),
            address: coerce_text(raw.address).unwrap_or_else(|| MISSING_ADDRESS.to_string()),
            latitude,
            longitude,
        })
    }

    pub fn coords(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// A facility annotated with its distance from the search origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFacility {
    #[serde(flatten)]
    pub facility: Facility,
    pub distance_km: f64,
}

impl RankedFacility {
    /// Rank `facility` against `origin`
    pub fn new(origin: Coordinate, facility: Facility) -> Self {
        let distance_km = haversine_km(origin, facility.coords());
        Self {
            facility,
            distance_km,
        }
    }

    /// `"{name} ({distance} km) - {address}"` with the distance to 2 decimals
    pub fn label(&self) -> String {
        format!(
            "{} ({} km) - {}",
            self.facility.name,
            format_km(self.distance_km),
            self.facility.address
        )
    }
}

/// One entry of a selection list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEntry {
    /// Value submitted when the entry is chosen
    pub value: String,
    /// Text shown to the user
    pub label: String,
    /// Placeholder entries cannot be chosen
    pub placeholder: bool,
}

impl SelectionEntry {
    fn sentinel() -> Self {
        Self {
            value: String::new(),
            label: CHOOSE_HOSPITAL.to_string(),
            placeholder: true,
        }
    }
}

/// Distance-annotated facilities behind a "choose a hospital" placeholder
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionList {
    facilities: Vec<RankedFacility>,
}

impl SelectionList {
    /// List holding only the placeholder
    pub fn sentinel_only() -> Self {
        Self::default()
    }

    /// Build the list for a lookup response, in response order
    ///
    /// Records with invalid coordinates are logged and skipped.
    pub fn from_response(origin: Coordinate, response: &LookupResponse) -> Self {
        let Some(records) = response.hospitals.as_deref() else {
            return Self::sentinel_only();
        };

        let facilities = records
            .iter()
            .filter_map(|record| match Facility::from_json(record) {
                Some(facility) => Some(RankedFacility::new(origin, facility)),
                None => {
                    let lat = record.get("latitude").cloned().unwrap_or_default();
                    let lng = record.get("longitude").cloned().unwrap_or_default();
                    warn!("Invalid hospital coordinates: {} {}", lat, lng);
                    None
                }
            })
            .collect();

        Self { facilities }
    }

    /// All entries, placeholder first
    pub fn entries(&self) -> Vec<SelectionEntry> {
        std::iter::once(SelectionEntry::sentinel())
            .chain(self.facilities.iter().map(|f| SelectionEntry {
                value: f.facility.name.clone(),
                label: f.label(),
                placeholder: false,
            }))
            .collect()
    }

    pub fn facilities(&self) -> &[RankedFacility] {
        &self.facilities
    }

    /// Number of facility entries, placeholder excluded
    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    /// True when only the placeholder is present
    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// Closest facility, ignoring list order
    pub fn nearest(&self) -> Option<&RankedFacility> {
        self.facilities
            .iter()
            .min_by(|a, b| a.distance_km.total_cmp(&b.distance_km))
    }
}

/// Ranks facilities returned by a lookup backend
#[derive(Debug, Clone)]
pub struct HospitalRanker<L> {
    lookup: L,
}

impl<L: FacilityLookup> HospitalRanker<L> {
    pub fn new(lookup: L) -> Self {
        Self { lookup }
    }

    /// The lookup backend this ranker queries
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Rank facilities around the coordinate shown in the location field
    ///
    /// Fails before any network call when the field is empty
    /// (`NoValidCoordinates`) or does not parse (`InvalidLocationFormat`).
    pub async fn rank_from_display(&self, display: &str, radius: u32) -> Result<SelectionList> {
        if display.trim().is_empty() {
            return Err(Error::NoValidCoordinates);
        }

        let origin = Coordinate::parse_display(display)?;
        self.rank(origin, radius).await
    }

    /// Rank facilities within `radius` of `origin`
    ///
    /// `radius` is sent to the service unconverted.
    pub async fn rank(&self, origin: Coordinate, radius: u32) -> Result<SelectionList> {
        if !origin.is_finite() {
            return Err(Error::InvalidLocationFormat(format!(
                "origin ({}, {}) is not finite",
                origin.lat, origin.lng
            )));
        }

        info!("Fetching hospitals within a radius of {}...", radius);
        let response = self.lookup.find_nearest(origin, radius).await?;

        let list = SelectionList::from_response(origin, &response);
        for ranked in list.facilities() {
            info!(
                "Hospital: {}, Distance: {} km",
                ranked.facility.name,
                format_km(ranked.distance_km)
            );
        }

        Ok(list)
    }
}

/// Parse a radius typed by the user
///
/// Reads the leading run of digits (`"10km"` is 10). Empty, non-numeric or
/// negative input is rejected.
pub fn parse_radius(input: &str) -> Result<u32> {
    let trimmed = input.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    if unsigned.starts_with('-') {
        return Err(Error::InvalidRadius(format!("'{}' is negative", input.trim())));
    }

    let digits: String = unsigned.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(Error::InvalidRadius(format!("'{}' is not a number", input.trim())));
    }

    digits
        .parse()
        .map_err(|_| Error::InvalidRadius(format!("'{}' is too large", input.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Lookup backend serving a canned body and recording calls
    struct CannedLookup {
        body: Result<Value>,
        calls: AtomicUsize,
        last_radius: Mutex<Option<u32>>,
    }

    impl CannedLookup {
        fn ok(body: Value) -> Self {
            Self {
                body: Ok(body),
                calls: AtomicUsize::new(0),
                last_radius: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                body: Err(Error::NetworkOrParseFailure("connection refused".into())),
                calls: AtomicUsize::new(0),
                last_radius: Mutex::new(None),
            }
        }
    }

    impl FacilityLookup for CannedLookup {
        async fn find_nearest(&self, _origin: Coordinate, radius: u32) -> Result<LookupResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_radius.lock().unwrap() = Some(radius);
            match &self.body {
                Ok(body) => Ok(serde_json::from_value(body.clone())?),
                Err(e) => Err(Error::NetworkOrParseFailure(e.to_string())),
            }
        }
    }

    /// A point due north of the equator origin at roughly `km` kilometers
    fn north_of_origin(km: f64) -> f64 {
        km / 6371.0 * 180.0 / std::f64::consts::PI
    }

    #[test]
    fn test_label_two_decimals() {
        let ranked = RankedFacility {
            facility: Facility {
                name: "General".to_string(),
                address: "1 Main St".to_string(),
                latitude: 0.0,
                longitude: 0.0,
            },
            distance_km: 5.0,
        };
        assert_eq!(ranked.label(), "General (5.00 km) - 1 Main St");
    }

    #[test]
    fn test_five_km_facility_label() {
        let response: LookupResponse = serde_json::from_value(json!({
            "hospitals": [{
                "name": "General",
                "address": "1 Main St",
                "latitude": north_of_origin(5.0),
                "longitude": 0.0
            }]
        }))
        .unwrap();

        let list = SelectionList::from_response(Coordinate::new(0.0, 0.0), &response);
        let entries = list.entries();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].label, "General (5.00 km) - 1 Main St");
        assert_eq!(entries[1].value, "General");
    }

    #[test]
    fn test_sentinel_always_first() {
        let list = SelectionList::sentinel_only();
        let entries = list.entries();

        assert!(list.is_empty());
        assert_eq!(entries.len(), 1);
        assert!(entries[0].placeholder);
        assert_eq!(entries[0].label, "Choose a hospital");
        assert_eq!(entries[0].value, "");
    }

    #[test]
    fn test_invalid_records_skipped() {
        let response: LookupResponse = serde_json::from_value(json!({
            "hospitals": [
                {"name": "Bad Lat", "address": "x", "latitude": "north", "longitude": 1.0},
                {"name": "No Lng", "address": "x", "latitude": 1.0},
                {"name": "Null", "address": "x", "latitude": null, "longitude": 1.0},
                "not an object",
                {"name": "Good", "address": "y", "latitude": 0.01, "longitude": 0.01}
            ]
        }))
        .unwrap();

        let list = SelectionList::from_response(Coordinate::new(0.0, 0.0), &response);

        assert_eq!(list.len(), 1);
        assert_eq!(list.facilities()[0].facility.name, "Good");
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let facility = Facility::from_json(&json!({
            "name": "Stringly",
            "address": "z",
            "latitude": "12.5",
            "longitude": " 77.25 "
        }))
        .unwrap();

        assert_eq!(facility.coords(), Coordinate::new(12.5, 77.25));
    }

    #[test]
    fn test_non_string_name_and_address_rendered() {
        let response: LookupResponse = serde_json::from_value(json!({
            "hospitals": [
                {"name": "General", "address": 42, "latitude": 0.01, "longitude": 0.0},
                {"name": 7, "address": null, "latitude": 0.01, "longitude": 0.0}
            ]
        }))
        .unwrap();

        let list = SelectionList::from_response(Coordinate::new(0.0, 0.0), &response);

        assert_eq!(list.len(), 2);
        assert_eq!(list.facilities()[0].facility.address, "42");
        assert_eq!(list.facilities()[1].facility.name, "7");
        assert_eq!(list.facilities()[1].facility.address, "N/A");
        assert_eq!(list.entries()[2].label, "7 (1.11 km) - N/A");
    }

    #[test]
    fn test_missing_address_defaults() {
        let facility = Facility::from_json(&json!({
            "name": "Clinic",
            "latitude": 1.0,
            "longitude": 2.0
        }))
        .unwrap();

        assert_eq!(facility.address, "N/A");
    }

    #[test]
    fn test_response_order_preserved() {
        let response: LookupResponse = serde_json::from_value(json!({
            "hospitals": [
                {"name": "Far", "address": "a", "latitude": north_of_origin(9.0), "longitude": 0.0},
                {"name": "Near", "address": "b", "latitude": north_of_origin(1.0), "longitude": 0.0},
                {"name": "Middle", "address": "c", "latitude": north_of_origin(4.0), "longitude": 0.0}
            ]
        }))
        .unwrap();

        let list = SelectionList::from_response(Coordinate::new(0.0, 0.0), &response);
        let names: Vec<_> = list.facilities().iter().map(|f| f.facility.name.as_str()).collect();

        assert_eq!(names, ["Far", "Near", "Middle"]);
        assert_eq!(list.nearest().unwrap().facility.name, "Near");
        assert_abs_diff_eq!(list.facilities()[1].distance_km, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_hospitals_is_empty() {
        let list = SelectionList::from_response(Coordinate::new(0.0, 0.0), &LookupResponse::default());
        assert!(list.is_empty());
        assert_eq!(list.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_rank_forwards_radius_unconverted() {
        let lookup = CannedLookup::ok(json!({"hospitals": []}));
        let ranker = HospitalRanker::new(lookup);

        let list = ranker.rank(Coordinate::new(12.97, 77.59), 25).await.unwrap();

        assert!(list.is_empty());
        assert_eq!(*ranker.lookup.last_radius.lock().unwrap(), Some(25));
    }

    #[tokio::test]
    async fn test_rank_from_empty_display_makes_no_call() {
        let ranker = HospitalRanker::new(CannedLookup::ok(json!({"hospitals": []})));

        let err = ranker.rank_from_display("", 10).await.unwrap_err();
        assert!(matches!(err, Error::NoValidCoordinates));

        let err = ranker.rank_from_display("   ", 10).await.unwrap_err();
        assert!(matches!(err, Error::NoValidCoordinates));

        assert_eq!(ranker.lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rank_from_bad_display_makes_no_call() {
        let ranker = HospitalRanker::new(CannedLookup::ok(json!({"hospitals": []})));

        let err = ranker
            .rank_from_display("Latitude: abc, Longitude: def", 10)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidLocationFormat(_)));
        assert_eq!(ranker.lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rank_non_finite_origin_makes_no_call() {
        let ranker = HospitalRanker::new(CannedLookup::ok(json!({"hospitals": []})));

        let err = ranker
            .rank(Coordinate::new(f64::NAN, 0.0), 10)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidLocationFormat(_)));
        assert_eq!(ranker.lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rank_propagates_lookup_failure() {
        let ranker = HospitalRanker::new(CannedLookup::failing());

        let err = ranker
            .rank_from_display("Latitude: 1.0, Longitude: 2.0", 10)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NetworkOrParseFailure(_)));
    }

    #[test]
    fn test_parse_radius() {
        assert_eq!(parse_radius("10").unwrap(), 10);
        assert_eq!(parse_radius(" 25 ").unwrap(), 25);
        assert_eq!(parse_radius("10km").unwrap(), 10);
        assert_eq!(parse_radius("+7").unwrap(), 7);
        assert_eq!(parse_radius("0").unwrap(), 0);
        assert_eq!(parse_radius("3.9").unwrap(), 3);

        assert!(parse_radius("").is_err());
        assert!(parse_radius("km").is_err());
        assert!(parse_radius("-5").is_err());
        assert!(parse_radius("99999999999999").is_err());
    }
}
