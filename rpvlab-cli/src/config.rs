//! Configuration loading from rpvlab.toml
//!
//! Sampler and output defaults can be specified in a `rpvlab.toml` file.
//! The configuration is automatically discovered by walking up from the current directory.

use anyhow::Context;
use rpvlab_stats::{
    DEFAULT_BINS, DEFAULT_CHAINS, DEFAULT_CREDIBLE_LEVEL, DEFAULT_DRAWS, DEFAULT_NORMAL_SAMPLES,
    DEFAULT_SEED, DEFAULT_TARGET_ACCEPTANCE, DEFAULT_TUNE,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "rpvlab.toml";

/// rpvlab configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RpvConfig {
    /// Sampler configuration
    #[serde(default)]
    pub sampler: SamplerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
    /// Credible interval configuration
    #[serde(default)]
    pub credible: CredibleConfig,
}

/// Sampler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Sampling method: "normal" or "mcmc"
    #[serde(default = "default_method")]
    pub method: String,
    /// Normal method draws per group
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// MCMC retained draws per chain
    #[serde(default = "default_draws")]
    pub draws: usize,
    /// MCMC tuning steps per chain
    #[serde(default = "default_tune")]
    pub tune: usize,
    /// MCMC chains
    #[serde(default = "default_chains")]
    pub chains: usize,
    /// Random seed shared by both methods
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Acceptance rate targeted while tuning
    #[serde(default = "default_target_acceptance")]
    pub target_acceptance: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            samples: default_samples(),
            draws: default_draws(),
            tune: default_tune(),
            chains: default_chains(),
            seed: default_seed(),
            target_acceptance: default_target_acceptance(),
        }
    }
}

fn default_method() -> String {
    "normal".to_string()
}
fn default_samples() -> usize {
    DEFAULT_NORMAL_SAMPLES
}
fn default_draws() -> usize {
    DEFAULT_DRAWS
}
fn default_tune() -> usize {
    DEFAULT_TUNE
}
fn default_chains() -> usize {
    DEFAULT_CHAINS
}
fn default_seed() -> u64 {
    DEFAULT_SEED
}
fn default_target_acceptance() -> f64 {
    DEFAULT_TARGET_ACCEPTANCE
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "markdown"
    #[serde(default = "default_format")]
    pub format: String,
    /// Prefix for monetary values
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Histogram bins
    #[serde(default = "default_bins")]
    pub bins: usize,
    /// Histogram width in terminal columns
    #[serde(default = "default_histogram_width")]
    pub histogram_width: usize,
    /// Histogram height in terminal rows
    #[serde(default = "default_histogram_height")]
    pub histogram_height: usize,
    /// Draw the histogram
    #[serde(default = "default_show_histogram")]
    pub show_histogram: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            currency: default_currency(),
            bins: default_bins(),
            histogram_width: default_histogram_width(),
            histogram_height: default_histogram_height(),
            show_histogram: default_show_histogram(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}
fn default_currency() -> String {
    "R$".to_string()
}
fn default_bins() -> usize {
    DEFAULT_BINS
}
fn default_histogram_width() -> usize {
    DEFAULT_BINS
}
fn default_histogram_height() -> usize {
    12
}
fn default_show_histogram() -> bool {
    true
}

/// Credible interval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredibleConfig {
    /// Interval mass (0.0 to 1.0, exclusive)
    #[serde(default = "default_level")]
    pub level: f64,
}

impl Default for CredibleConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> f64 {
    DEFAULT_CREDIBLE_LEVEL
}

impl RpvConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Find `rpvlab.toml` by walking up from `start`
    pub fn find(start: impl AsRef<Path>) -> Option<std::path::PathBuf> {
        let mut dir = start.as_ref().to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Some(config_path);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Discover and load configuration by walking up from the current directory
    ///
    /// Returns `Ok(None)` when no file exists; a file that fails to parse is an error.
    pub fn discover() -> anyhow::Result<Option<Self>> {
        let cwd = std::env::current_dir()?;
        match Self::find(cwd) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading configuration");
                Self::load(path).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# rpvlab Configuration

[sampler]
# Sampling method: "normal" or "mcmc"
method = "normal"
# Normal method draws per group
samples = 100000
# MCMC retained draws per chain
draws = 10000
# MCMC tuning steps per chain (discarded)
tune = 1000
# MCMC chains
chains = 2
# Random seed
seed = 42
# Acceptance rate targeted while tuning
target_acceptance = 0.44

[output]
# Default output format: human, json, markdown
format = "human"
# Prefix for monetary values
currency = "R$"
# Histogram bins
bins = 50
# Terminal histogram size
histogram_width = 50
histogram_height = 12
show_histogram = true

[credible]
# Credible interval mass (0.0 to 1.0)
level = 0.95
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RpvConfig::default();
        assert_eq!(config.sampler.method, "normal");
        assert_eq!(config.sampler.samples, 100_000);
        assert_eq!(config.sampler.seed, 42);
        assert_eq!(config.output.currency, "R$");
        assert!(config.output.show_histogram);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [sampler]
            method = "mcmc"
            draws = 2000

            [output]
            currency = "$"
        "#;

        let config: RpvConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sampler.method, "mcmc");
        assert_eq!(config.sampler.draws, 2000);
        assert_eq!(config.output.currency, "$");
        // Defaults should still apply
        assert_eq!(config.sampler.chains, 2);
        assert_eq!(config.output.format, "human");
        assert!((config.credible.level - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn test_default_toml_parses() {
        let default_toml = RpvConfig::default_toml();
        let config: RpvConfig = toml::from_str(&default_toml).unwrap();
        assert_eq!(config.sampler.method, "normal");
        assert_eq!(config.sampler.tune, 1000);
        assert_eq!(config.output.bins, 50);
        assert_eq!(config.output.histogram_height, 12);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        assert!(toml::from_str::<RpvConfig>("[sampler]\nsamples = \"many\"").is_err());
    }
}
