//! Source estimation from bearing observations
//!
//! Method selection:
//! - fewer than two observations: no estimate
//! - exactly two: exact forward intersection of the two bearing rays
//! - three or more, or two whose rays do not meet ahead of both
//!   stations: least-squares intersection of all bearing lines
//!
//! Every call is independent. The reference frame is rebuilt from the
//! snapshot each time, and the snapshot is put in a canonical order
//! first so permuted inputs give bit-identical results.

use crate::algorithms::least_squares::{rms_residual, LeastSquaresIntersector};
use crate::algorithms::projection::{reference_point, CoordinateProjector};
use crate::algorithms::ray_intersection::{Ray, RayIntersector};
use crate::core::{Estimate, EstimationMethod, Observation, Point2D, ReferencePoint, MIN_OBSERVATIONS};
use crate::utils::config::{EngineConfig, LinePolicy};
use crate::validation::{validate_observations, EstimationError, EstimationResult};
use tracing::debug;

/// A fix with the frame it was solved in and its fit quality
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    pub estimate: Estimate,
    pub reference: ReferencePoint,
    /// RMS perpendicular distance from the fix to the lines it was fitted to (meters)
    pub rms_residual_m: f64,
    /// Observations that contributed to the fix
    pub lines_used: usize,
}

/// Stateless estimation engine
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SourceEstimator {
    config: EngineConfig,
}

impl SourceEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with custom settings; they are checked on every call
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Best estimate of the emitter position, or `None` when the snapshot
    /// cannot produce one
    pub fn estimate(&self, observations: &[Observation]) -> Option<Estimate> {
        match self.try_estimate(observations) {
            Ok(estimate) => Some(estimate),
            Err(err) => {
                debug!(observations = observations.len(), "no estimate: {}", err);
                None
            }
        }
    }

    /// Like [`estimate`](Self::estimate) but reports why no fix exists
    pub fn try_estimate(&self, observations: &[Observation]) -> EstimationResult<Estimate> {
        self.try_solve(observations).map(|solution| solution.estimate)
    }

    /// Full solve, including the reference point and residual of the fit
    pub fn try_solve(&self, observations: &[Observation]) -> EstimationResult<Solution> {
        self.config
            .validate()
            .map_err(|err| EstimationError::InvalidConfiguration { reason: err.to_string() })?;

        if observations.len() < MIN_OBSERVATIONS {
            return Err(EstimationError::InsufficientData {
                available: observations.len(),
                required: MIN_OBSERVATIONS,
            });
        }
        validate_observations(observations)?;

        let mut snapshot: Vec<&Observation> = observations.iter().collect();
        snapshot.sort_by(|a, b| a.canonical_cmp(b));

        let reference = reference_point(observations)?;
        let projector = CoordinateProjector::with_pole_epsilon(reference, self.config.pole_epsilon)?;

        let rays: Vec<Ray> = snapshot
            .iter()
            .map(|o| Ray::from_bearing(projector.project_observation(o), o.bearing_deg))
            .collect();

        if rays.len() == 2 {
            let intersector = RayIntersector::with_tolerance(self.config.determinant_tolerance);
            match intersector.intersect(&rays[0], &rays[1]) {
                Ok(point) => {
                    debug!(x = point.x, y = point.y, "two-ray fix");
                    return Ok(Solution {
                        estimate: Estimate::new(projector.unproject(&point), EstimationMethod::TwoRay),
                        reference: projector.reference(),
                        rms_residual_m: rms_residual(&rays, &point),
                        lines_used: rays.len(),
                    });
                }
                Err(err) => debug!("two-ray intersection failed, falling back to least squares: {}", err),
            }
        }

        let (point, used) = self.solve_lines(&rays)?;
        debug!(x = point.x, y = point.y, lines = used.len(), "least-squares fix");
        Ok(Solution {
            estimate: Estimate::new(projector.unproject(&point), EstimationMethod::LeastSquares),
            reference: projector.reference(),
            rms_residual_m: rms_residual(&used, &point),
            lines_used: used.len(),
        })
    }

    /// Least-squares fix and the lines it was fitted to
    fn solve_lines(&self, rays: &[Ray]) -> EstimationResult<(Point2D, Vec<Ray>)> {
        let solver = LeastSquaresIntersector::with_tolerance(self.config.determinant_tolerance);
        let point = solver.solve(rays)?;

        match self.config.line_policy {
            LinePolicy::InfiniteLines => Ok((point, rays.to_vec())),
            LinePolicy::ForwardRays => {
                let (ahead, behind): (Vec<Ray>, Vec<Ray>) =
                    rays.iter().copied().partition(|ray| ray.parameter_of(&point) >= 0.0);
                if behind.is_empty() {
                    return Ok((point, ahead));
                }

                let min_parameter = behind
                    .iter()
                    .map(|ray| ray.parameter_of(&point))
                    .fold(f64::INFINITY, f64::min);
                if ahead.len() < MIN_OBSERVATIONS {
                    return Err(EstimationError::BackwardIntersection {
                        behind_count: behind.len(),
                        min_parameter,
                    });
                }

                debug!(
                    discarded = behind.len(),
                    min_parameter, "dropping observations whose fix lies behind them"
                );
                let point = solver.solve(&ahead)?;
                Ok((point, ahead))
            }
        }
    }
}

/// Estimate with the default engine configuration
pub fn estimate_source(observations: &[Observation]) -> Option<Estimate> {
    SourceEstimator::default().estimate(observations)
}

/// Estimate with the default engine configuration, reporting failures
pub fn try_estimate(observations: &[Observation]) -> EstimationResult<Estimate> {
    SourceEstimator::default().try_estimate(observations)
}
