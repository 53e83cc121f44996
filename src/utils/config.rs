use crate::core::{
    DEFAULT_DETERMINANT_TOLERANCE, DEFAULT_ESTIMATE_RADIUS_M, DEFAULT_POLE_EPSILON,
    DEFAULT_RAY_LENGTH_M,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// How the least-squares path interprets bearings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinePolicy {
    /// Bearings are infinite lines; fixes behind a sensor are accepted
    #[default]
    InfiniteLines,
    /// Observations whose fix lies behind them are dropped and the
    /// remainder re-solved once
    ForwardRays,
}

/// Numerical settings for the estimation engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Determinant magnitude below which a 2x2 system is singular
    pub determinant_tolerance: f64,
    /// Smallest accepted |cos(reference latitude)|
    pub pole_epsilon: f64,
    /// Ray or line semantics whenever the least-squares path runs,
    /// including the fallback for two observations
    pub line_policy: LinePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            determinant_tolerance: DEFAULT_DETERMINANT_TOLERANCE,
            pole_epsilon: DEFAULT_POLE_EPSILON,
            line_policy: LinePolicy::InfiniteLines,
        }
    }
}

/// System-wide configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Estimation engine settings
    pub engine: EngineConfig,
    /// Length of rendered bearing rays (meters)
    pub ray_length_m: f64,
    /// Radius of the marker drawn around an estimate (meters)
    pub estimate_radius_m: f64,
    /// Enable debug logging
    pub debug_logging: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            ray_length_m: DEFAULT_RAY_LENGTH_M,
            estimate_radius_m: DEFAULT_ESTIMATE_RADIUS_M,
            debug_logging: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid parameter {parameter} = {value}: {reason}")]
    InvalidParameter { parameter: String, value: String, reason: String },

    #[error("failed to access config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize config: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no file path set for saving configuration")]
    NoFilePath,
}

impl EngineConfig {
    /// Check the solver tolerances, returning the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("engine.determinant_tolerance", self.determinant_tolerance)?;
        positive("engine.pole_epsilon", self.pole_epsilon)?;
        if self.pole_epsilon >= 1.0 {
            return Err(invalid(
                "engine.pole_epsilon",
                self.pole_epsilon,
                "must be below 1 or every reference latitude is rejected",
            ));
        }
        Ok(())
    }
}

impl SystemConfig {
    /// Check every parameter, returning the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        positive("ray_length_m", self.ray_length_m)?;
        if !self.estimate_radius_m.is_finite() || self.estimate_radius_m < 0.0 {
            return Err(invalid(
                "estimate_radius_m",
                self.estimate_radius_m,
                "must be a finite, non-negative distance",
            ));
        }
        Ok(())
    }
}

fn positive(parameter: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(parameter, value, "must be finite and greater than zero"))
    }
}

fn invalid(parameter: &str, value: f64, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter: parameter.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Main configuration manager
#[derive(Debug, Default)]
pub struct ConfigurationManager {
    /// Current system configuration
    system_config: SystemConfig,
    /// Configuration file path
    config_file_path: Option<PathBuf>,
    /// Whether configuration has been modified
    is_modified: bool,
}

impl ConfigurationManager {
    /// Create a new configuration manager with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration manager and load from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn system_config(&self) -> &SystemConfig {
        &self.system_config
    }

    pub fn engine_config(&self) -> EngineConfig {
        self.system_config.engine
    }

    /// Replace the system configuration after validation
    pub fn update_system_config(&mut self, config: SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.system_config = config;
        self.is_modified = true;
        Ok(())
    }

    /// Update the solver determinant tolerance, returning the old value
    pub fn set_determinant_tolerance(&mut self, tolerance: f64) -> Result<f64, ConfigError> {
        positive("engine.determinant_tolerance", tolerance)?;
        let old_value = self.system_config.engine.determinant_tolerance;
        self.system_config.engine.determinant_tolerance = tolerance;
        self.is_modified = true;
        Ok(old_value)
    }

    pub fn set_line_policy(&mut self, policy: LinePolicy) -> LinePolicy {
        let old_value = self.system_config.engine.line_policy;
        self.system_config.engine.line_policy = policy;
        self.is_modified = true;
        old_value
    }

    /// Update the rendered ray length, returning the old value
    pub fn set_ray_length(&mut self, ray_length_m: f64) -> Result<f64, ConfigError> {
        positive("ray_length_m", ray_length_m)?;
        let old_value = self.system_config.ray_length_m;
        self.system_config.ray_length_m = ray_length_m;
        self.is_modified = true;
        Ok(old_value)
    }

    /// Load configuration from JSON file
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: SystemConfig = serde_json::from_str(&content)?;
        config.validate()?;

        self.system_config = config;
        self.config_file_path = Some(path.to_path_buf());
        self.is_modified = false;
        info!(path = %path.display(), "loaded configuration");
        Ok(())
    }

    /// Save configuration to JSON file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(&self.system_config)?;

        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.config_file_path = Some(path.to_path_buf());
        self.is_modified = false;
        info!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Save to the currently loaded file path
    pub fn save(&mut self) -> Result<(), ConfigError> {
        match self.config_file_path.clone() {
            Some(path) => self.save_to_file(path),
            None => Err(ConfigError::NoFilePath),
        }
    }

    /// Check if configuration has been modified since last save
    pub fn is_modified(&self) -> bool {
        self.is_modified
    }
}
