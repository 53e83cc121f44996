//! Physical constants and engine defaults

/// Mean Earth radius used by the tangent-plane projection (m)
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Minimum number of observations that can produce a fix
pub const MIN_OBSERVATIONS: usize = 2;

/// Determinant magnitude below which a 2x2 solve is treated as singular
pub const DEFAULT_DETERMINANT_TOLERANCE: f64 = 1e-9;

/// Smallest |cos(ref_lat)| accepted before the frame is considered polar
pub const DEFAULT_POLE_EPSILON: f64 = 1e-12;

/// Length of rendered bearing rays (m)
pub const DEFAULT_RAY_LENGTH_M: f64 = 10_000.0;

/// Radius of the marker drawn around an estimate (m)
pub const DEFAULT_ESTIMATE_RADIUS_M: f64 = 50.0;
