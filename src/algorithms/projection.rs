//! Geodetic to local tangent-plane conversion
//!
//! Equirectangular approximation around a reference point:
//!
//! ```text
//! x = R * Δlng * cos(ref_lat)     (east, meters)
//! y = R * Δlat                    (north, meters)
//! ```
//!
//! Accurate for spans of a few tens of kilometers. The east scale shrinks
//! toward the poles, so constructing a projector whose reference latitude
//! drives `cos(ref_lat)` below the pole epsilon fails instead of producing
//! infinite longitudes on the way back.

use crate::core::{GeoPoint, Observation, Point2D, ReferencePoint, DEFAULT_POLE_EPSILON, EARTH_RADIUS_M};
use crate::validation::{EstimationError, EstimationResult};

/// Tangent-plane frame anchored at a reference point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateProjector {
    reference: ReferencePoint,
    cos_ref_lat: f64,
}

impl CoordinateProjector {
    /// Frame around `reference` using the default pole epsilon
    pub fn new(reference: ReferencePoint) -> EstimationResult<Self> {
        Self::with_pole_epsilon(reference, DEFAULT_POLE_EPSILON)
    }

    pub fn with_pole_epsilon(reference: ReferencePoint, pole_epsilon: f64) -> EstimationResult<Self> {
        if !reference.is_valid() {
            return Err(EstimationError::InvalidReference {
                ref_lat: reference.ref_lat,
                ref_lng: reference.ref_lng,
            });
        }

        let cos_ref_lat = reference.ref_lat.to_radians().cos();
        if cos_ref_lat.abs() < pole_epsilon {
            return Err(EstimationError::PoleProximity {
                ref_lat: reference.ref_lat,
                cos_ref_lat,
            });
        }

        Ok(Self { reference, cos_ref_lat })
    }

    pub fn reference(&self) -> ReferencePoint {
        self.reference
    }

    /// Geodetic degrees to local meters
    pub fn project(&self, lat: f64, lng: f64) -> Point2D {
        let x = EARTH_RADIUS_M * (lng - self.reference.ref_lng).to_radians() * self.cos_ref_lat;
        let y = EARTH_RADIUS_M * (lat - self.reference.ref_lat).to_radians();
        Point2D::new(x, y)
    }

    pub fn project_point(&self, point: &GeoPoint) -> Point2D {
        self.project(point.lat, point.lng)
    }

    pub fn project_observation(&self, observation: &Observation) -> Point2D {
        self.project(observation.lat, observation.lng)
    }

    /// Local meters back to geodetic degrees (inverse of `project`)
    pub fn unproject(&self, point: &Point2D) -> GeoPoint {
        let lat = self.reference.ref_lat + (point.y / EARTH_RADIUS_M).to_degrees();
        let lng = self.reference.ref_lng + (point.x / (EARTH_RADIUS_M * self.cos_ref_lat)).to_degrees();
        GeoPoint::new(lat, lng)
    }
}

/// Project a single point without building a frame.
///
/// Projection only multiplies by `cos(ref_lat)`, so it needs no pole guard.
pub fn project(lat: f64, lng: f64, ref_lat: f64, ref_lng: f64) -> Point2D {
    let x = EARTH_RADIUS_M * (lng - ref_lng).to_radians() * ref_lat.to_radians().cos();
    let y = EARTH_RADIUS_M * (lat - ref_lat).to_radians();
    Point2D::new(x, y)
}

/// Inverse of [`project`]; fails near the poles
pub fn unproject(x: f64, y: f64, ref_lat: f64, ref_lng: f64) -> EstimationResult<GeoPoint> {
    let projector = CoordinateProjector::new(ReferencePoint::new(ref_lat, ref_lng))?;
    Ok(projector.unproject(&Point2D::new(x, y)))
}

/// Centroid of the observations' positions.
///
/// Coordinates are summed in sorted order so the result is bit-identical
/// for any permutation of the input.
pub fn reference_point(observations: &[Observation]) -> EstimationResult<ReferencePoint> {
    if observations.is_empty() {
        return Err(EstimationError::InsufficientData { available: 0, required: 1 });
    }

    let reference = ReferencePoint::new(
        sorted_mean(observations.iter().map(|o| o.lat)),
        sorted_mean(observations.iter().map(|o| o.lng)),
    );

    if !reference.is_valid() {
        return Err(EstimationError::InvalidReference {
            ref_lat: reference.ref_lat,
            ref_lng: reference.ref_lng,
        });
    }
    Ok(reference)
}

fn sorted_mean(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.iter().sum::<f64>() / values.len() as f64
}
