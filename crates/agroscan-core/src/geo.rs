//! Geocoordinate utilities: great-circle distance and bounding boxes.

use serde::{Deserialize, Serialize};

/// Earth radius used by the Google Maps spherical geometry helpers.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// The `{0, 0}` point used when nothing better is known.
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Great-circle distance between two points in metres (haversine).
#[must_use]
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Great-circle distance in kilometres, rounded to one decimal place.
#[must_use]
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    round_to_tenth(distance_m(a, b) / 1000.0)
}

#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Smallest lat/lng box containing every point it has been extended with.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeoBounds {
    extent: Option<(GeoPoint, GeoPoint)>,
}

impl GeoBounds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, p: GeoPoint) {
        self.extent = Some(match self.extent {
            None => (p, p),
            Some((sw, ne)) => (
                GeoPoint::new(sw.lat.min(p.lat), sw.lng.min(p.lng)),
                GeoPoint::new(ne.lat.max(p.lat), ne.lng.max(p.lng)),
            ),
        });
    }

    #[must_use]
    pub fn south_west(&self) -> Option<GeoPoint> {
        self.extent.map(|(sw, _)| sw)
    }

    #[must_use]
    pub fn north_east(&self) -> Option<GeoPoint> {
        self.extent.map(|(_, ne)| ne)
    }
}
