//! Terminal points of rendered bearing rays

use crate::algorithms::bearing::direction_unit_vector;
use crate::algorithms::projection::CoordinateProjector;
use crate::core::{GeoPoint, ReferencePoint};
use crate::validation::EstimationResult;

/// Point `length_m` meters along the bearing from `origin`.
///
/// `reference` must be the frame used for everything else drawn in the
/// same pass, otherwise rays from different stations will not line up.
pub fn ray_endpoint(
    origin: &GeoPoint,
    bearing_deg: f64,
    length_m: f64,
    reference: &ReferencePoint,
) -> EstimationResult<GeoPoint> {
    let projector = CoordinateProjector::new(*reference)?;
    Ok(endpoint_in_frame(&projector, origin, bearing_deg, length_m))
}

/// Same as [`ray_endpoint`] with an already constructed frame
pub fn endpoint_in_frame(
    projector: &CoordinateProjector,
    origin: &GeoPoint,
    bearing_deg: f64,
    length_m: f64,
) -> GeoPoint {
    let start = projector.project_point(origin);
    let end = start + direction_unit_vector(bearing_deg) * length_m;
    projector.unproject(&end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_north_ray_only_changes_latitude() {
        let reference = ReferencePoint::new(10.0, 20.0);
        let end = ray_endpoint(&GeoPoint::new(10.0, 20.0), 0.0, 10_000.0, &reference).unwrap();

        assert_abs_diff_eq!(end.lng, 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(end.lat, 10.0 + (10_000.0_f64 / 6_371_000.0).to_degrees(), epsilon = 1e-12);
    }

    #[test]
    fn test_ray_length_in_frame() {
        let reference = ReferencePoint::new(-33.0, 151.0);
        let projector = CoordinateProjector::new(reference).unwrap();
        let origin = GeoPoint::new(-33.01, 151.02);

        let end = endpoint_in_frame(&projector, &origin, 137.0, 2500.0);
        let span = projector.project_point(&end) - projector.project_point(&origin);
        assert_abs_diff_eq!(span.norm(), 2500.0, epsilon = 1e-6);
    }

    #[test]
    fn test_pole_reference_rejected() {
        let reference = ReferencePoint::new(90.0, 0.0);
        assert!(ray_endpoint(&GeoPoint::new(89.0, 0.0), 0.0, 100.0, &reference).is_err());
    }
}
