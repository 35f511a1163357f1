//! Configuration system for FactorForge.
//!
//! Load factor graph configuration from TOML or YAML to control domain
//! growth, parameter initialization and model scoring without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use factorforge_config::{FactorGraphConfig, NeighborhoodConfig};
//!
//! let config = FactorGraphConfig::from_toml_str(r#"
//!     [domain]
//!     max_categories = 5000
//!     freeze_on_build = true
//!
//!     [weights]
//!     initial_value = 0.01
//!     convergence_threshold = 1e-4
//!
//!     [scoring]
//!     neighborhood = "contained"
//!     parallel_threshold = 256
//! "#).unwrap();
//!
//! assert_eq!(config.domain.max_categories, Some(5000));
//! assert_eq!(config.scoring.neighborhood, NeighborhoodConfig::Contained);
//! assert!(config.validate().is_ok());
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use factorforge_config::FactorGraphConfig;
//!
//! let config = FactorGraphConfig::load("factorforge.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

#[cfg(test)]
mod tests;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default convergence threshold for parameter comparisons.
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 1e-6;

/// Default factor count above which scoring runs in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1024;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main factor graph configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FactorGraphConfig {
    /// Categorical domain behavior.
    #[serde(default)]
    pub domain: DomainConfig,

    /// Parameter store behavior.
    #[serde(default)]
    pub weights: WeightsConfig,

    /// Model query and scoring behavior.
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl FactorGraphConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, choosing the format by extension.
    ///
    /// `.yaml` and `.yml` files are read as YAML, everything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or fails to parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Limits categorical domains to `max` categories.
    pub fn with_max_categories(mut self, max: usize) -> Self {
        self.domain.max_categories = Some(max);
        self
    }

    /// Freezes categorical domains when the graph is finished.
    pub fn with_freeze_on_build(mut self, freeze: bool) -> Self {
        self.domain.freeze_on_build = freeze;
        self
    }

    /// Sets the fill value of newly created weights.
    pub fn with_initial_value(mut self, value: f64) -> Self {
        self.weights.initial_value = value;
        self
    }

    /// Sets the parameter convergence threshold.
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.weights.convergence_threshold = threshold;
        self
    }

    /// Sets the default neighborhood of model queries.
    pub fn with_neighborhood(mut self, neighborhood: NeighborhoodConfig) -> Self {
        self.scoring.neighborhood = neighborhood;
        self
    }

    /// Sets the factor count above which scoring runs in parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.scoring.parallel_threshold = threshold;
        self
    }

    /// Checks values that would make the graph unusable.
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` for a zero category limit or a negative or
    /// non-finite convergence threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain.max_categories == Some(0) {
            return Err(ConfigError::Invalid(
                "domain.max_categories must be at least 1".to_string(),
            ));
        }
        let threshold = self.weights.convergence_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "weights.convergence_threshold must be a non-negative number, got {threshold}"
            )));
        }
        Ok(())
    }
}

/// Categorical domain configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DomainConfig {
    /// Maximum number of categories per categorical domain.
    #[serde(default)]
    pub max_categories: Option<usize>,

    /// Freeze categorical domains when the graph is finished.
    #[serde(default)]
    pub freeze_on_build: bool,
}

/// Parameter store configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct WeightsConfig {
    /// Fill value of newly created weights.
    #[serde(default)]
    pub initial_value: f64,

    /// Aggregate L1 distance below which two parameter sets are converged.
    #[serde(default = "default_convergence_threshold")]
    pub convergence_threshold: f64,
}

fn default_convergence_threshold() -> f64 {
    DEFAULT_CONVERGENCE_THRESHOLD
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            initial_value: 0.0,
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
        }
    }
}

/// Model scoring configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ScoringConfig {
    /// Default neighborhood of `factors` queries.
    #[serde(default)]
    pub neighborhood: NeighborhoodConfig,

    /// Factor count above which scoring runs in parallel.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            neighborhood: NeighborhoodConfig::default(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Which factors count as neighboring a queried variable set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborhoodConfig {
    /// Factors touching any queried variable.
    #[default]
    Any,

    /// Factors all of whose variables are queried.
    Contained,
}
