//! Compass bearing helpers

use crate::core::Point2D;

/// Eight-point compass rose, clockwise from north
const COMPASS_POINTS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// Unit direction of a bearing in the local frame.
///
/// 0° is north (+y) and 90° is east (+x). Out-of-range bearings are
/// accepted as-is since the trigonometry is periodic.
pub fn direction_unit_vector(bearing_deg: f64) -> Point2D {
    let theta = bearing_deg.to_radians();
    Point2D::new(theta.sin(), theta.cos())
}

/// Nearest eight-point compass label for a bearing
pub fn compass_point(bearing_deg: f64) -> &'static str {
    let normalized = bearing_deg.rem_euclid(360.0);
    let index = (normalized / 45.0).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[index]
}
