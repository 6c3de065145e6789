//! Heading between two positions

use geo::geometry::Point;

use super::position::CanonicalPosition;

/// Initial great-circle bearing from `from` to `to`, both `(lon, lat)` points
///
/// Result is in degrees clockwise from north, in `[0, 360)`. Equal points are
/// not special-cased.
pub fn bearing(from: Point, to: Point) -> f64 {
    let lat1 = from.y().to_radians();
    let lat2 = to.y().to_radians();
    let dlon = (to.x() - from.x()).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    let deg = (y.atan2(x).to_degrees() + 360.0) % 360.0;

    // rounding can still land on 360.0
    if deg >= 360.0 {
        0.0
    } else {
        deg
    }
}

/// Headings between each pair of consecutive positions
pub fn headings(positions: &[CanonicalPosition]) -> Vec<f64> {
    positions
        .windows(2)
        .map(|pair| bearing(pair[0].point(), pair[1].point()))
        .collect()
}
