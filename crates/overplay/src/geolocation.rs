//! Geolocation
//!
//! Location fixes are only delivered to the engine once the device has moved
//! farther than the distance filter from the last delivered fix.

use overplay_motion::LocationEvent;
use smol::stream::{Stream, StreamExt};

/// Mean Earth radius (meters)
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two fixes (meters)
pub fn distance_meters(a: &LocationEvent, b: &LocationEvent) -> f64 {
    let (lat_a, lat_b) = (a.latitude.to_radians(), b.latitude.to_radians());
    let d_lat = lat_b - lat_a;
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Minimum-displacement filter
#[derive(Debug, Clone)]
pub struct DistanceFilter {
    meters: f64,
    last: Option<LocationEvent>,
}

impl DistanceFilter {
    pub fn new(meters: f64) -> Self {
        Self { meters, last: None }
    }

    /// The first fix always passes; later ones must move more than the
    /// threshold away from the last accepted fix.
    pub fn accept(&mut self, fix: &LocationEvent) -> bool {
        if !fix.latitude.is_finite() || !fix.longitude.is_finite() {
            return false;
        }
        let accepted = match &self.last {
            None => true,
            Some(last) => distance_meters(last, fix) > self.meters,
        };
        if accepted {
            self.last = Some(*fix);
        } else {
            tracing::trace!("Location fix within {} m filtered", self.meters);
        }
        accepted
    }
}

/// Apply a distance filter to a stream of raw fixes
pub fn watch_position<S>(
    fixes: S,
    meters: f64,
) -> impl Stream<Item = LocationEvent> + Send + 'static
where
    S: Stream<Item = LocationEvent> + Send + 'static,
{
    let mut filter = DistanceFilter::new(meters);
    fixes.filter(move |fix| filter.accept(fix))
}
