//! Input validation and failure classification

pub mod data;
pub mod error;

pub use data::{validate_observation, validate_observations};
pub use error::{EstimationError, EstimationResult};
