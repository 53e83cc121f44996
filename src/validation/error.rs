//! Failure classification for source estimation
//!
//! None of these are fatal: they describe why a particular observation
//! snapshot has no fix. Callers that only care about the fix use
//! `estimate_source`, which maps every variant to `None`.

use thiserror::Error;

/// Reasons an estimation call produced no result
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimationError {
    /// Fewer observations than the solver needs
    #[error("insufficient data: {available} observation(s) available, {required} required")]
    InsufficientData { available: usize, required: usize },

    /// Determinant below tolerance: parallel rays/lines or a singular configuration
    #[error("parallel or degenerate geometry: |det| = {determinant:e} below tolerance {tolerance:e}")]
    ParallelOrDegenerate { determinant: f64, tolerance: f64 },

    /// The bearings cross behind one or more sensors
    #[error("intersection lies behind {behind_count} sensor(s) (ray parameter {min_parameter:.3})")]
    BackwardIntersection { behind_count: usize, min_parameter: f64 },

    /// Reference latitude too close to a pole for the tangent-plane frame
    #[error("reference latitude {ref_lat} too close to pole (|cos| = {cos_ref_lat:e})")]
    PoleProximity { ref_lat: f64, cos_ref_lat: f64 },

    /// Centroid is not a usable frame origin
    #[error("invalid reference point ({ref_lat}, {ref_lng})")]
    InvalidReference { ref_lat: f64, ref_lng: f64 },

    /// An observation violates the input contract
    #[error("invalid observation from station '{station_id}': {reason}")]
    InvalidObservation { station_id: String, reason: String },

    /// Engine settings that would let a degenerate solve through
    #[error("invalid engine configuration: {reason}")]
    InvalidConfiguration { reason: String },
}

impl EstimationError {
    /// Whether more observations could resolve the failure
    pub fn is_recoverable_with_more_data(&self) -> bool {
        matches!(
            self,
            EstimationError::InsufficientData { .. }
                | EstimationError::ParallelOrDegenerate { .. }
                | EstimationError::BackwardIntersection { .. }
        )
    }
}

/// Result type for estimation operations
pub type EstimationResult<T> = Result<T, EstimationError>;
