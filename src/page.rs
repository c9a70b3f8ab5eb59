//! Locator page controller
//!
//! Wires the resolver and the ranker to the injected display surfaces. The
//! components only return results; all surface updates happen here.

use crate::constants::labels::{HOSPITALS_OK, LOCATE_BUSY, LOCATE_IDLE, LOCATION_OK};
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::geo::{LocationResolver, PositionProvider};
use crate::hospitals::lookup::FacilityLookup;
use crate::hospitals::{parse_radius, HospitalRanker, SelectionList};
use crate::ui::{BusyGuard, LocationField, Notice, Notifier, SelectionControl, TriggerControl};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::error;

/// Display surfaces the page writes to
#[derive(Clone)]
pub struct Surfaces {
    pub location_field: Arc<dyn LocationField>,
    pub locate_button: Arc<dyn TriggerControl>,
    pub destination: Arc<dyn SelectionControl>,
    pub notifier: Arc<dyn Notifier>,
}

/// Marks an action as running until dropped
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| Error::RequestInFlight)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// The hospital locator page
pub struct LocatorPage<P, L> {
    resolver: LocationResolver<P>,
    ranker: HospitalRanker<L>,
    surfaces: Surfaces,
    locating: AtomicBool,
    ranking: AtomicBool,
}

impl<P: PositionProvider, L: FacilityLookup> LocatorPage<P, L> {
    pub fn new(resolver: LocationResolver<P>, ranker: HospitalRanker<L>, surfaces: Surfaces) -> Self {
        surfaces.locate_button.set_label(LOCATE_IDLE);
        surfaces.locate_button.set_enabled(true);

        Self {
            resolver,
            ranker,
            surfaces,
            locating: AtomicBool::new(false),
            ranking: AtomicBool::new(false),
        }
    }

    pub fn surfaces(&self) -> &Surfaces {
        &self.surfaces
    }

    /// Handle a click on the location trigger
    ///
    /// On success the location field holds `Latitude: {lat}, Longitude: {lng}`.
    /// The trigger is disabled while the request runs and always restored.
    pub async fn on_get_location(&self) -> Result<Coordinate> {
        let _flight = match InFlight::acquire(&self.locating) {
            Ok(flight) => flight,
            Err(e) => return Err(self.fail(e)),
        };

        if !self.resolver.is_available() {
            return Err(self.fail(Error::CapabilityUnavailable));
        }

        let _busy = BusyGuard::engage(self.surfaces.locate_button.as_ref(), LOCATE_BUSY, LOCATE_IDLE);

        match self.resolver.resolve().await {
            Ok(coords) => {
                self.surfaces.location_field.set_value(&coords.to_string());
                self.surfaces.notifier.notify(Notice::success(LOCATION_OK));
                Ok(coords)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Handle a click on the hospital search trigger
    ///
    /// `radius_input` is the raw radius field text. The selection list is
    /// replaced only when the lookup succeeds; failures leave it as it was.
    pub async fn on_get_hospitals(&self, radius_input: &str) -> Result<SelectionList> {
        let _flight = match InFlight::acquire(&self.ranking) {
            Ok(flight) => flight,
            Err(e) => return Err(self.fail(e)),
        };

        let location = self.surfaces.location_field.value();
        if location.trim().is_empty() {
            return Err(self.fail(Error::NoValidCoordinates));
        }

        let radius = parse_radius(radius_input).map_err(|e| self.fail(e))?;

        match self.ranker.rank_from_display(&location, radius).await {
            Ok(list) => {
                self.surfaces.destination.replace_entries(list.entries());
                if list.is_empty() {
                    self.surfaces
                        .notifier
                        .notify(Notice::info(Error::EmptyResult.user_message()));
                } else {
                    self.surfaces.notifier.notify(Notice::success(HOSPITALS_OK));
                }
                Ok(list)
            }
            Err(e) => {
                error!("Error fetching hospitals: {}", e);
                Err(self.fail(e))
            }
        }
    }

    /// Notify the user of `err` and hand it back
    fn fail(&self, err: Error) -> Error {
        self.surfaces
            .notifier
            .notify(Notice::failure(err.user_message()));
        err
    }
}
