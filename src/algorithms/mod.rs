//! Triangulation algorithms

pub mod projection;
pub mod bearing;
pub mod ray_intersection;
pub mod least_squares;
pub mod estimator;
pub mod ray_endpoint;

pub use projection::{project, reference_point, unproject, CoordinateProjector};
pub use bearing::{compass_point, direction_unit_vector};
pub use ray_intersection::{Ray, RayIntersector};
pub use least_squares::{rms_residual, LeastSquaresIntersector};
pub use estimator::{estimate_source, try_estimate, Solution, SourceEstimator};
pub use ray_endpoint::{endpoint_in_frame, ray_endpoint};
