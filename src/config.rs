//! Import configuration.
//!
//! [ImportConfig] bundles every tunable of the import pipeline. It can be
//! built in code, loaded from a TOML file, or assembled fluently via
//! [SkeletonImporterBuilder](crate::import::SkeletonImporterBuilder).
//! Missing TOML keys fall back to the defaults.
//!
//! ```toml
//! resampling_factor = 3
//! coordinate_scale = 10000.0
//! soma_radius_threshold = 10.0
//! geometry = "full_resolution"
//!
//! [cluster]
//! merge_distance = 1.5
//! cluster_count = 4
//! ```

use crate::cluster::ClusterConfig;
use crate::model::DEFAULT_COORDINATE_SCALE;
use crate::skeleton::{DEFAULT_MAX_TRAVERSAL_STEPS, DEFAULT_SOMA_RADIUS_THRESHOLD, PathGeometry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read config file - {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML - {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for `{field}` - {reason}")]
    Invalid { field: &'static str, reason: String },
}

// =#========================================================================#=
// IMPORT CONFIG
// =#========================================================================#=
/// Tunables of the import pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Decimation factor `k >= 1`; `1` keeps every node
    pub resampling_factor: usize,
    /// Divisor from source coordinates to scene units
    pub coordinate_scale: f64,
    /// Radius above which a node is taken as soma (source units)
    pub soma_radius_threshold: f64,
    /// Points emitted per path
    pub geometry: PathGeometry,
    /// Step cap of the path walk
    pub max_traversal_steps: usize,
    /// Soma clustering and coloring
    pub cluster: ClusterConfig,
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            resampling_factor: 1,
            coordinate_scale: DEFAULT_COORDINATE_SCALE,
            soma_radius_threshold: DEFAULT_SOMA_RADIUS_THRESHOLD,
            geometry: PathGeometry::default(),
            max_traversal_steps: DEFAULT_MAX_TRAVERSAL_STEPS,
            cluster: ClusterConfig::default(),
        }
    }
}

impl ImportConfig {
    /// Parses and validates a configuration from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> ConfigResult<Self> {
        let config: ImportConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Arguments
    /// * `path` - Path to a TOML file (accepting `&str`, `String`, `Path`, or `PathBuf`)
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Checks all values for consistency.
    ///
    /// # Errors
    /// [ConfigError::Invalid] naming the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigResult<()> {
            Err(ConfigError::Invalid {
                field,
                reason: reason.into(),
            })
        }

        if self.resampling_factor == 0 {
            return invalid("resampling_factor", "must be at least 1");
        }
        if !(self.coordinate_scale.is_finite() && self.coordinate_scale > 0.0) {
            return invalid(
                "coordinate_scale",
                format!("must be positive and finite, got {}", self.coordinate_scale),
            );
        }
        if self.soma_radius_threshold.is_nan() {
            return invalid("soma_radius_threshold", "must be a number");
        }
        if self.max_traversal_steps == 0 {
            return invalid("max_traversal_steps", "must be at least 1");
        }

        let cluster = &self.cluster;
        if !(cluster.neighborhood_radius >= 0.0) {
            return invalid("cluster.neighborhood_radius", "must be non-negative");
        }
        if !(cluster.merge_distance >= 0.0) {
            return invalid("cluster.merge_distance", "must be non-negative");
        }
        if !(cluster.falloff_distance >= 0.0) {
            return invalid("cluster.falloff_distance", "must be non-negative");
        }
        if !(0.0..=1.0).contains(&cluster.min_value) {
            return invalid("cluster.min_value", "must be within [0, 1]");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ImportConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ImportConfig::from_toml_str(
            r#"
            resampling_factor = 3
            geometry = "full_resolution"

            [cluster]
            cluster_count = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.resampling_factor, 3);
        assert_eq!(config.geometry, PathGeometry::FullResolution);
        assert_eq!(config.coordinate_scale, DEFAULT_COORDINATE_SCALE);
        assert_eq!(config.cluster.cluster_count, 4);
        assert_eq!(config.cluster.merge_distance, 1.0);
    }

    #[test]
    fn test_zero_factor_rejected() {
        let result = ImportConfig::from_toml_str("resampling_factor = 0");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { field: "resampling_factor", .. })
        ));
    }

    #[test]
    fn test_malformed_toml() {
        let result = ImportConfig::from_toml_str("resampling_factor = [");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
