//! Bearing Triangulation Engine
//!
//! Locates an emitter from compass bearings taken at known positions,
//! using a local tangent-plane frame with exact two-ray intersection and
//! least-squares line intersection.

pub mod core;
pub mod algorithms;
pub mod validation;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{Estimate, EstimationMethod, GeoPoint, Observation, Point2D, ReferencePoint, EARTH_RADIUS_M};
pub use crate::algorithms::{
    compass_point, direction_unit_vector, estimate_source, project, ray_endpoint, reference_point,
    try_estimate, unproject, CoordinateProjector, LeastSquaresIntersector, Ray, RayIntersector,
    Solution, SourceEstimator,
};
pub use crate::validation::{EstimationError, EstimationResult};
pub use crate::utils::{ConfigError, ConfigurationManager, EngineConfig, LinePolicy, SystemConfig};
pub use crate::api::{build_overlay, EstimateReport, Overlay, OutputFormat};
