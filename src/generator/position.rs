//! Position definition

use geo::geometry::Point;
use serde::{Deserialize, Serialize};

/// Canonical version of a vehicle position
///
/// Every field is always present, missing source values are `0`. No range
/// checks are applied, values are forwarded as received.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// Percentage, not clamped
    pub battery: f64,
    /// Unit as received
    pub speed: f64,
}

impl CanonicalPosition {
    pub fn new(latitude: f64, longitude: f64, battery: f64, speed: f64) -> Self {
        Self {
            latitude,
            longitude,
            battery,
            speed,
        }
    }

    /// Position at the coordinates, no battery or speed info
    pub fn basic(coordinates: Point) -> Self {
        Self {
            latitude: coordinates.y(),
            longitude: coordinates.x(),
            battery: 0.0,
            speed: 0.0,
        }
    }

    /// Coordinates as a `(lon, lat)` point
    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}
