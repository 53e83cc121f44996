//! Exact intersection of two forward bearing rays

use crate::algorithms::bearing::direction_unit_vector;
use crate::core::{Point2D, DEFAULT_DETERMINANT_TOLERANCE};
use crate::validation::{EstimationError, EstimationResult};

/// Half-line `origin + t * direction`, `t >= 0`.
///
/// The least-squares solver reuses the same type and reads it as an
/// infinite line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point2D,
    pub direction: Point2D,
}

impl Ray {
    pub fn new(origin: Point2D, direction: Point2D) -> Self {
        Self { origin, direction }
    }

    /// Ray leaving `origin` along a compass bearing (unit direction)
    pub fn from_bearing(origin: Point2D, bearing_deg: f64) -> Self {
        Self::new(origin, direction_unit_vector(bearing_deg))
    }

    pub fn point_at(&self, t: f64) -> Point2D {
        self.origin + self.direction * t
    }

    /// Signed distance of the projection of `point` along the ray.
    ///
    /// Negative values lie behind the origin.
    pub fn parameter_of(&self, point: &Point2D) -> f64 {
        (point - self.origin).dot(&self.direction)
    }
}

/// Two-ray solver using Cramer's rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayIntersector {
    pub determinant_tolerance: f64,
}

impl Default for RayIntersector {
    fn default() -> Self {
        Self {
            determinant_tolerance: DEFAULT_DETERMINANT_TOLERANCE,
        }
    }
}

impl RayIntersector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tolerance(determinant_tolerance: f64) -> Self {
        Self { determinant_tolerance }
    }

    /// Point where both rays meet ahead of their origins.
    ///
    /// Solves `o1 + t*d1 = o2 + s*d2`. Parallel rays give
    /// `ParallelOrDegenerate`; a crossing with `t < 0` or `s < 0` gives
    /// `BackwardIntersection` even though the underlying lines meet.
    pub fn intersect(&self, first: &Ray, second: &Ray) -> EstimationResult<Point2D> {
        let d1 = &first.direction;
        let d2 = &second.direction;
        let delta = second.origin - first.origin;

        let det = d2.x * d1.y - d1.x * d2.y;
        if det.is_nan() || det.abs() < self.determinant_tolerance {
            return Err(EstimationError::ParallelOrDegenerate {
                determinant: det,
                tolerance: self.determinant_tolerance,
            });
        }

        let t = (delta.y * d2.x - delta.x * d2.y) / det;
        let s = (d1.x * delta.y - d1.y * delta.x) / det;
        if !t.is_finite() || !s.is_finite() {
            return Err(EstimationError::ParallelOrDegenerate {
                determinant: det,
                tolerance: self.determinant_tolerance,
            });
        }

        if t < 0.0 || s < 0.0 {
            let behind_count = (t < 0.0) as usize + (s < 0.0) as usize;
            return Err(EstimationError::BackwardIntersection {
                behind_count,
                min_parameter: t.min(s),
            });
        }

        Ok(first.point_at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_perpendicular_rays_meet() {
        // West station looking east, south station looking north
        let a = Ray::from_bearing(Point2D::new(-100.0, 0.0), 90.0);
        let b = Ray::from_bearing(Point2D::new(0.0, -100.0), 0.0);

        let p = RayIntersector::new().intersect(&a, &b).unwrap();
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_oblique_rays_meet_at_target() {
        let target = Point2D::new(300.0, 400.0);
        let o1 = Point2D::new(0.0, 0.0);
        let o2 = Point2D::new(1000.0, 0.0);
        let a = Ray::new(o1, (target - o1).normalize());
        let b = Ray::new(o2, (target - o2).normalize());

        let p = RayIntersector::new().intersect(&a, &b).unwrap();
        assert_abs_diff_eq!(p.x, target.x, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, target.y, epsilon = 1e-9);
    }

    #[test]
    fn test_parallel_rays_rejected() {
        let a = Ray::from_bearing(Point2D::new(0.0, 0.0), 45.0);
        let b = Ray::from_bearing(Point2D::new(50.0, 0.0), 45.0);
        assert!(matches!(
            RayIntersector::new().intersect(&a, &b),
            Err(EstimationError::ParallelOrDegenerate { .. })
        ));

        let c = Ray::from_bearing(Point2D::new(50.0, 0.0), 225.0);
        assert!(matches!(
            RayIntersector::new().intersect(&a, &c),
            Err(EstimationError::ParallelOrDegenerate { .. })
        ));
    }

    #[test]
    fn test_backward_crossing_rejected() {
        // Both stations look away from the point where their lines cross
        let a = Ray::from_bearing(Point2D::new(-100.0, 0.0), 270.0);
        let b = Ray::from_bearing(Point2D::new(0.0, -100.0), 180.0);

        match RayIntersector::new().intersect(&a, &b) {
            Err(EstimationError::BackwardIntersection { behind_count, min_parameter }) => {
                assert_eq!(behind_count, 2);
                assert!(min_parameter < 0.0);
            }
            other => panic!("expected backward intersection, got {:?}", other),
        }
    }

    #[test]
    fn test_one_ray_backward_rejected() {
        let a = Ray::from_bearing(Point2D::new(-100.0, 0.0), 90.0);
        let b = Ray::from_bearing(Point2D::new(0.0, -100.0), 180.0);
        assert!(matches!(
            RayIntersector::new().intersect(&a, &b),
            Err(EstimationError::BackwardIntersection { behind_count: 1, .. })
        ));
    }

    #[test]
    fn test_custom_tolerance() {
        // Nearly parallel: det ~ sin(0.001°) ~ 1.7e-5
        let a = Ray::from_bearing(Point2D::new(0.0, 0.0), 10.0);
        let b = Ray::from_bearing(Point2D::new(10.0, 0.0), 9.999);
        assert!(RayIntersector::new().intersect(&a, &b).is_ok());
        assert!(RayIntersector::with_tolerance(1e-3).intersect(&a, &b).is_err());
    }

    #[test]
    fn test_parallel_rays_rejected_without_usable_tolerance() {
        let a = Ray::from_bearing(Point2D::new(0.0, 0.0), 0.0);
        let b = Ray::from_bearing(Point2D::new(10.0, 0.0), 0.0);
        for tolerance in [f64::NAN, -1.0] {
            assert!(matches!(
                RayIntersector::with_tolerance(tolerance).intersect(&a, &b),
                Err(EstimationError::ParallelOrDegenerate { .. })
            ));
        }
    }

    #[test]
    fn test_parameter_of() {
        let ray = Ray::from_bearing(Point2D::new(0.0, 0.0), 0.0);
        assert_abs_diff_eq!(ray.parameter_of(&Point2D::new(3.0, 5.0)), 5.0);
        assert_abs_diff_eq!(ray.parameter_of(&Point2D::new(0.0, -2.0)), -2.0);
    }
}
