//! Map overlay geometry
//!
//! Everything a map layer needs to draw one observation snapshot: bearing
//! rays, strength circles, the estimate marker and a bounding box that
//! fits all of it. All geometry shares the snapshot's reference point.

use crate::algorithms::bearing::compass_point;
use crate::algorithms::estimator::SourceEstimator;
use crate::algorithms::projection::{reference_point, CoordinateProjector};
use crate::algorithms::ray_endpoint::endpoint_in_frame;
use crate::core::{Estimate, GeoPoint, Observation, ReferencePoint};
use crate::utils::config::SystemConfig;
use crate::validation::{validate_observations, EstimationResult};
use serde::{Deserialize, Serialize};

/// Rendered bearing line for one observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BearingRay {
    pub station_id: String,
    pub origin: GeoPoint,
    pub end: GeoPoint,
    pub bearing_deg: f64,
    pub compass: String,
    /// Radius of the strength circle, present only for positive strength
    pub strength_radius_m: Option<f64>,
}

/// Latitude/longitude bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl Bounds {
    pub fn around(point: &GeoPoint) -> Self {
        Self {
            min_lat: point.lat,
            min_lng: point.lng,
            max_lat: point.lat,
            max_lng: point.lng,
        }
    }

    pub fn extend(&mut self, point: &GeoPoint) {
        self.min_lat = self.min_lat.min(point.lat);
        self.min_lng = self.min_lng.min(point.lng);
        self.max_lat = self.max_lat.max(point.lat);
        self.max_lng = self.max_lng.max(point.lng);
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lng..=self.max_lng).contains(&point.lng)
    }
}

/// Overlay for one snapshot; empty when there are no observations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub reference: Option<ReferencePoint>,
    pub rays: Vec<BearingRay>,
    pub estimate: Option<Estimate>,
    pub estimate_radius_m: Option<f64>,
    /// Box covering every station and ray end
    pub bounds: Option<Bounds>,
}

/// Build the overlay for a snapshot
pub fn build_overlay(observations: &[Observation], config: &SystemConfig) -> EstimationResult<Overlay> {
    if observations.is_empty() {
        return Ok(Overlay::default());
    }
    validate_observations(observations)?;

    let reference = reference_point(observations)?;
    let projector = CoordinateProjector::with_pole_epsilon(reference, config.engine.pole_epsilon)?;

    let mut bounds: Option<Bounds> = None;
    let mut rays = Vec::with_capacity(observations.len());

    for observation in observations {
        let origin = observation.position();
        let end = endpoint_in_frame(&projector, &origin, observation.bearing_deg, config.ray_length_m);

        let b = bounds.get_or_insert_with(|| Bounds::around(&origin));
        b.extend(&origin);
        b.extend(&end);

        rays.push(BearingRay {
            station_id: observation.station_id.clone(),
            origin,
            end,
            bearing_deg: observation.bearing_deg,
            compass: compass_point(observation.bearing_deg).to_string(),
            strength_radius_m: observation.strength.filter(|s| *s > 0.0),
        });
    }

    let estimate = SourceEstimator::with_config(config.engine).estimate(observations);

    Ok(Overlay {
        reference: Some(projector.reference()),
        rays,
        estimate,
        estimate_radius_m: estimate.map(|_| config.estimate_radius_m),
        bounds,
    })
}
