//! Pipeline configuration loaded from TOML.
//!
//! Every field has a default equal to the fixed pipeline constants, so an
//! empty file (or no file at all) reproduces the standard run:
//!
//! ```toml
//! [pricing]
//! initial_price = 100.0
//! horizon_years = 1.0
//! steps = 252
//! n_paths = 1000
//! seed = 42
//!
//! [integration]
//! window = 60
//! n_paths = 1000
//! seed = 42
//!
//! [topology]
//! histogram_bins = 20
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tmrisk_core::integration::RollingParams;
use tmrisk_core::pricing::CallPricingParams;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopologyConfig {
    /// Bins per homology dimension in the lifetime histogram.
    pub histogram_bins: usize,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self { histogram_bins: 20 }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub pricing: CallPricingParams,
    pub integration: RollingParams,
    pub topology: TopologyConfig,
}

impl PipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.pricing;
        if !(p.initial_price.is_finite() && p.initial_price > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "pricing.initial_price must be positive, got {}",
                p.initial_price
            )));
        }
        if !(p.horizon_years.is_finite() && p.horizon_years > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "pricing.horizon_years must be positive, got {}",
                p.horizon_years
            )));
        }
        if p.steps == 0 || p.n_paths == 0 {
            return Err(ConfigError::Invalid(
                "pricing.steps and pricing.n_paths must be at least 1".into(),
            ));
        }
        if self.integration.window < 2 {
            return Err(ConfigError::Invalid(format!(
                "integration.window must be at least 2, got {}",
                self.integration.window
            )));
        }
        if self.integration.n_paths == 0 {
            return Err(ConfigError::Invalid(
                "integration.n_paths must be at least 1".into(),
            ));
        }
        if self.topology.histogram_bins == 0 {
            return Err(ConfigError::Invalid(
                "topology.histogram_bins must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmrisk_core::rng::SimulationSeed;

    #[test]
    fn empty_toml_is_default() {
        let config = PipelineConfig::from_toml("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.pricing.steps, 252);
        assert_eq!(config.integration.window, 60);
        assert_eq!(config.topology.histogram_bins, 20);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = PipelineConfig::from_toml(
            r#"
            [pricing]
            n_paths = 5000
            seed = 7

            [integration]
            window = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.pricing.n_paths, 5000);
        assert_eq!(config.pricing.seed, SimulationSeed::new(7));
        assert_eq!(config.pricing.initial_price, 100.0);
        assert_eq!(config.integration.window, 30);
        assert_eq!(config.integration.n_paths, 1000);
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            PipelineConfig::from_toml("[integration]\nwindow = 1"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            PipelineConfig::from_toml("[topology]\nhistogram_bins = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            PipelineConfig::from_toml("[pricing]\nhorizon_years = -1.0"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        assert!(matches!(
            PipelineConfig::from_toml("[pricing\nsteps = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PipelineConfig::from_file(Path::new("/nonexistent/tmrisk.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = PipelineConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(PipelineConfig::from_toml(&text).unwrap(), config);
    }

    // ── Property tests (proptest) ──

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn valid_configs_round_trip(
            steps in 1usize..1000,
            n_paths in 1usize..10_000,
            window in 2usize..250,
            bins in 1usize..100,
            seed in 0u64..(i64::MAX as u64),
        ) {
            let config = PipelineConfig {
                pricing: CallPricingParams {
                    steps,
                    n_paths,
                    seed: SimulationSeed::new(seed),
                    ..CallPricingParams::default()
                },
                integration: RollingParams { window, ..RollingParams::default() },
                topology: TopologyConfig { histogram_bins: bins },
            };
            let text = toml::to_string_pretty(&config).unwrap();
            prop_assert_eq!(PipelineConfig::from_toml(&text).unwrap(), config);
        }
    }
}
