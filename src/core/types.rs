//! Core data types for the triangulation engine

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Point in the local tangent-plane frame, meters (x = east, y = north)
pub type Point2D = Vector2<f64>;

/// A single bearing reading reported by a direction-finding station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Station (device) identifier
    pub station_id: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
    /// Bearing in degrees clockwise from true north
    pub bearing_deg: f64,
    /// Optional signal strength expressed as a range (meters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl Observation {
    /// Create an observation stamped with the current time
    pub fn new(station_id: impl Into<String>, lat: f64, lng: f64, bearing_deg: f64) -> Self {
        Self {
            station_id: station_id.into(),
            lat,
            lng,
            bearing_deg,
            strength: None,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_strength(mut self, strength_m: f64) -> Self {
        self.strength = Some(strength_m);
        self
    }

    pub fn with_timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp = timestamp_ms;
        self
    }

    /// Station position as a geodetic point
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// Total order used to canonicalize an observation snapshot.
    ///
    /// Geometry fields come first so that equal sets sort identically
    /// no matter how the caller ordered them.
    pub(crate) fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.lat
            .total_cmp(&other.lat)
            .then_with(|| self.lng.total_cmp(&other.lng))
            .then_with(|| self.bearing_deg.total_cmp(&other.bearing_deg))
            .then_with(|| self.station_id.cmp(&other.station_id))
            .then_with(|| self.timestamp.cmp(&other.timestamp))
            .then_with(|| match (self.strength, other.strength) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                (a, b) => a.is_some().cmp(&b.is_some()),
            })
    }
}

/// Geodetic point (decimal degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Origin of the local frame: centroid of the observation set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencePoint {
    pub ref_lat: f64,
    pub ref_lng: f64,
}

impl ReferencePoint {
    pub fn new(ref_lat: f64, ref_lng: f64) -> Self {
        Self { ref_lat, ref_lng }
    }

    /// Finite, with latitude inside [-90, 90]
    pub fn is_valid(&self) -> bool {
        self.ref_lat.is_finite()
            && self.ref_lng.is_finite()
            && (-90.0..=90.0).contains(&self.ref_lat)
    }
}

impl From<GeoPoint> for ReferencePoint {
    fn from(point: GeoPoint) -> Self {
        Self::new(point.lat, point.lng)
    }
}

/// Solver that produced an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EstimationMethod {
    /// Exact forward intersection of exactly two bearing rays
    TwoRay,
    /// Least-squares intersection of all bearing lines
    LeastSquares,
}

impl EstimationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimationMethod::TwoRay => "two-ray",
            EstimationMethod::LeastSquares => "least-squares",
        }
    }
}

impl fmt::Display for EstimationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated emitter position (a fix)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub lat: f64,
    pub lng: f64,
    pub method: EstimationMethod,
}

impl Estimate {
    pub fn new(position: GeoPoint, method: EstimationMethod) -> Self {
        Self {
            lat: position.lat,
            lng: position.lng,
            method,
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_json_uses_camel_case() {
        let obs = Observation::new("dev-1", 52.1, 4.3, 45.0)
            .with_strength(120.0)
            .with_timestamp(1_700_000_000_000);

        let json = serde_json::to_string(&obs).unwrap();
        assert!(json.contains("\"stationId\":\"dev-1\""));
        assert!(json.contains("\"bearingDeg\":45.0"));

        let parsed: Observation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, obs);
    }

    #[test]
    fn test_strength_is_optional_in_json() {
        let json = r#"{"stationId":"a","lat":1.0,"lng":2.0,"bearingDeg":90.0,"timestamp":5}"#;
        let obs: Observation = serde_json::from_str(json).unwrap();
        assert_eq!(obs.strength, None);
        assert_eq!(obs.timestamp, 5);
    }

    #[test]
    fn test_method_serializes_kebab_case() {
        let estimate = Estimate::new(GeoPoint::new(1.0, 2.0), EstimationMethod::LeastSquares);
        let json = serde_json::to_string(&estimate).unwrap();
        assert!(json.contains("\"method\":\"least-squares\""));
        assert_eq!(EstimationMethod::TwoRay.to_string(), "two-ray");
    }

    #[test]
    fn test_reference_point_validity() {
        assert!(ReferencePoint::new(45.0, 540.0).is_valid());
        assert!(!ReferencePoint::new(91.0, 0.0).is_valid());
        assert!(!ReferencePoint::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_canonical_order_ignores_input_order() {
        let a = Observation::new("a", 1.0, 2.0, 10.0).with_timestamp(1);
        let b = Observation::new("b", 1.0, 2.0, 20.0).with_timestamp(1);
        assert_eq!(a.canonical_cmp(&b), Ordering::Less);
        assert_eq!(b.canonical_cmp(&a), Ordering::Greater);
        assert_eq!(a.canonical_cmp(&a.clone()), Ordering::Equal);
    }
}
