use crate::core::Observation;
use crate::validation::error::{EstimationError, EstimationResult};
use tracing::warn;

/// Check one observation against the engine's input contract
pub fn validate_observation(observation: &Observation) -> EstimationResult<()> {
    let reject = |reason: String| EstimationError::InvalidObservation {
        station_id: observation.station_id.clone(),
        reason,
    };

    if !observation.lat.is_finite() || !(-90.0..=90.0).contains(&observation.lat) {
        return Err(reject(format!("latitude {} outside [-90, 90]", observation.lat)));
    }
    if !observation.lng.is_finite() {
        return Err(reject(format!("longitude {} is not finite", observation.lng)));
    }
    if !observation.bearing_deg.is_finite() {
        return Err(reject(format!("bearing {} is not finite", observation.bearing_deg)));
    }
    if let Some(strength) = observation.strength {
        if !strength.is_finite() || strength < 0.0 {
            return Err(reject(format!("strength {} must be a non-negative distance", strength)));
        }
    }

    Ok(())
}

/// Validate a snapshot, stopping at the first offending observation
pub fn validate_observations(observations: &[Observation]) -> EstimationResult<()> {
    for observation in observations {
        if let Err(err) = validate_observation(observation) {
            warn!(station = %observation.station_id, "rejecting observation snapshot: {}", err);
            return Err(err);
        }
    }
    Ok(())
}
