//! hospital-finder: Nearest-Hospital Lookup
//!
//! A library and CLI tool that resolves the user's location, asks a
//! facility-lookup service for nearby hospitals and presents them as a
//! distance-annotated selection list.
//!
//! ## Features
//!
//! - Position resolution with a classified failure taxonomy
//! - Haversine great-circle distance
//! - Distance-annotated hospital list in service order
//! - Injected display surfaces (field, trigger, list, notifier)
//!
//! ## Quick Start
//!
//! ```rust
//! use hospital_finder::coord::{distance::haversine_km, Coordinate};
//!
//! let origin = Coordinate::new(0.0, 0.0);
//! let east = Coordinate::new(0.0, 1.0);
//!
//! let km = haversine_km(origin, east);
//! assert!((km - 111.19).abs() < 0.1);
//!
//! // The location field round-trips through its display form
//! let shown = origin.to_string();
//! assert_eq!(shown, "Latitude: 0, Longitude: 0");
//! assert_eq!(Coordinate::parse_display(&shown).unwrap(), origin);
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod geo;
pub mod hospitals;
pub mod page;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinate;
pub use error::{Error, Result};
pub use geo::{LocationResolver, PositionProvider};
pub use hospitals::{HospitalRanker, RankedFacility, SelectionList};
pub use page::LocatorPage;
