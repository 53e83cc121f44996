//! Least-squares intersection of bearing lines
//!
//! Each line through `p` with unit direction `d` has normal `n = (-d.y, d.x)`;
//! a point `x` lies on it iff `n·x = n·p`. Summing the squared residuals
//! over all lines gives the normal equations
//!
//! ```text
//! (Σ n nᵀ) x = Σ n (n·p)
//! ```
//!
//! a symmetric 2x2 system solved with an explicit inverse. Lines are
//! infinite in both directions here.

use crate::algorithms::ray_intersection::Ray;
use crate::core::{Point2D, DEFAULT_DETERMINANT_TOLERANCE, MIN_OBSERVATIONS};
use crate::validation::{EstimationError, EstimationResult};
use nalgebra::{Matrix2, Vector2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeastSquaresIntersector {
    pub determinant_tolerance: f64,
}

impl Default for LeastSquaresIntersector {
    fn default() -> Self {
        Self {
            determinant_tolerance: DEFAULT_DETERMINANT_TOLERANCE,
        }
    }
}

impl LeastSquaresIntersector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(determinant_tolerance: f64) -> Self {
        Self { determinant_tolerance }
    }

    /// Point minimizing the summed squared perpendicular distance to all lines.
    ///
    /// Line directions must be unit vectors.
    pub fn solve(&self, lines: &[Ray]) -> EstimationResult<Point2D> {
        if lines.len() < MIN_OBSERVATIONS {
            return Err(EstimationError::InsufficientData {
                available: lines.len(),
                required: MIN_OBSERVATIONS,
            });
        }

        let mut normal_matrix = Matrix2::<f64>::zeros();
        let mut rhs = Vector2::<f64>::zeros();

        for line in lines {
            let normal = Vector2::new(-line.direction.y, line.direction.x);
            normal_matrix += normal * normal.transpose();
            rhs += normal * normal.dot(&line.origin);
        }

        let sxx = normal_matrix[(0, 0)];
        let sxy = normal_matrix[(0, 1)];
        let syy = normal_matrix[(1, 1)];

        let det = sxx * syy - sxy * sxy;
        if det.is_nan() || det.abs() < self.determinant_tolerance {
            return Err(EstimationError::ParallelOrDegenerate {
                determinant: det,
                tolerance: self.determinant_tolerance,
            });
        }

        let inverse = Matrix2::new(syy, -sxy, -sxy, sxx) / det;
        let point = inverse * rhs;
        if !point.iter().all(|v| v.is_finite()) {
            return Err(EstimationError::ParallelOrDegenerate {
                determinant: det,
                tolerance: self.determinant_tolerance,
            });
        }
        Ok(point)
    }
}

/// Perpendicular distance from `point` to the infinite line through `line`
pub fn perpendicular_distance(line: &Ray, point: &Point2D) -> f64 {
    let normal = Vector2::new(-line.direction.y, line.direction.x);
    normal.dot(&(point - line.origin)).abs()
}

/// Root-mean-square perpendicular distance of `point` to a set of lines
pub fn rms_residual(lines: &[Ray], point: &Point2D) -> f64 {
    if lines.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = lines
        .iter()
        .map(|line| perpendicular_distance(line, point).powi(2))
        .sum();
    (sum_sq / lines.len() as f64).sqrt()
}
