//! A/B Comparison
//!
//! Runs the full computation for one control/variation pair:
//!
//! ```text
//! GroupMetrics x 2
//!       │
//!       ▼
//! ┌─────────────┐
//! │  sampling   │  Normal approximation or MCMC posterior
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  summary    │  P(variation > control), difference CI, uplift
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  verdict    │  Threshold bucket + histogram
//! └─────────────┘
//! ```

use crate::diagnostics::{McmcDiagnostics, diagnose};
use crate::error::SamplerError;
use crate::histogram::{DEFAULT_BINS, Histogram, HistogramError};
use crate::mcmc::{ChainProgress, McmcConfig, PosteriorTrace, RpvModel, sample_posterior};
use crate::metrics::GroupMetrics;
use crate::normal::{NormalConfig, NormalSamples, analytic_probability, sample_normal};
use crate::percentiles::{CredibleInterval, credible_interval};
use crate::summary::{SummaryStatistics, compute_summary};
use crate::verdict::Verdict;
use crate::DEFAULT_CREDIBLE_LEVEL;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Which sampler produces the distributions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SamplingMethod {
    /// Independent Normal draws per group (closed-form approximation)
    #[default]
    Normal,
    /// Metropolis posterior sampling of the two-mean model
    Mcmc,
}

impl std::fmt::Display for SamplingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplingMethod::Normal => write!(f, "normal"),
            SamplingMethod::Mcmc => write!(f, "mcmc"),
        }
    }
}

impl std::str::FromStr for SamplingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" | "monte-carlo" => Ok(SamplingMethod::Normal),
            "mcmc" | "metropolis" => Ok(SamplingMethod::Mcmc),
            other => Err(format!("Unknown sampling method: {}", other)),
        }
    }
}

/// Configuration for a comparison
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonConfig {
    /// Sampler to use
    pub method: SamplingMethod,
    /// Normal sampler settings
    pub normal: NormalConfig,
    /// MCMC settings
    pub mcmc: McmcConfig,
    /// Mass of the difference credible interval (e.g. 0.95)
    pub credible_level: f64,
    /// Histogram bins
    pub bins: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            method: SamplingMethod::default(),
            normal: NormalConfig::default(),
            mcmc: McmcConfig::default(),
            credible_level: DEFAULT_CREDIBLE_LEVEL,
            bins: DEFAULT_BINS,
        }
    }
}

/// Sampled distributions behind a result
#[derive(Debug, Clone)]
pub enum SampleDistributions {
    /// Independent per-group Normal draws
    Independent(NormalSamples),
    /// MCMC posterior trace
    Posterior(PosteriorTrace),
}

impl SampleDistributions {
    /// Number of compared draws
    pub fn sample_count(&self) -> usize {
        match self {
            SampleDistributions::Independent(s) => s.control.len().min(s.variation.len()),
            SampleDistributions::Posterior(t) => t.total_draws(),
        }
    }
}

/// Result of comparing two groups
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    /// Sampler used
    pub method: SamplingMethod,
    /// Control group metrics
    pub control: GroupMetrics,
    /// Variation group metrics
    pub variation: GroupMetrics,
    /// Empirical P(variation > control), in [0, 1]
    pub prob_variation_better: f64,
    /// Closed-form probability for the Normal approximation (Normal method only)
    pub analytic_probability: Option<f64>,
    /// Summary of the `variation - control` draws
    pub difference: SummaryStatistics,
    /// Credible interval of the difference
    pub credible_interval: CredibleInterval,
    /// Relative change of variation RPV over control RPV, in percent
    pub relative_uplift: f64,
    /// Threshold bucket of `prob_variation_better`
    pub verdict: Verdict,
    /// Binned distributions for display
    pub histogram: Histogram,
    /// Convergence diagnostics (MCMC only)
    pub diagnostics: Option<McmcDiagnostics>,
    /// The raw draws
    pub distributions: SampleDistributions,
    /// Wall time spent sampling and summarising, in milliseconds
    pub duration_ms: f64,
}

/// Errors from comparison
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComparisonError {
    #[error("sampling failed: {0}")]
    Sampler(#[from] SamplerError),

    #[error("histogram failed: {0}")]
    Histogram(#[from] HistogramError),

    #[error("credible level must be in (0, 1), got {0}")]
    InvalidCredibleLevel(f64),
}

/// Compare two groups without progress reporting
pub fn compute(
    control: &GroupMetrics,
    variation: &GroupMetrics,
    config: &ComparisonConfig,
) -> Result<ComparisonResult, ComparisonError> {
    compute_with_progress(control, variation, config, &())
}

/// Compare two groups, reporting MCMC progress to `progress`
pub fn compute_with_progress(
    control: &GroupMetrics,
    variation: &GroupMetrics,
    config: &ComparisonConfig,
    progress: &dyn ChainProgress,
) -> Result<ComparisonResult, ComparisonError> {
    if !(config.credible_level > 0.0 && config.credible_level < 1.0) {
        return Err(ComparisonError::InvalidCredibleLevel(config.credible_level));
    }

    let start = Instant::now();
    tracing::debug!(
        method = %config.method,
        rpv_control = control.rpv,
        se_control = control.standard_error,
        rpv_variation = variation.rpv,
        se_variation = variation.standard_error,
        "starting comparison"
    );

    let (prob_variation_better, differences, histogram, diagnostics, distributions, analytic) =
        match config.method {
            SamplingMethod::Normal => {
                let samples = sample_normal(control, variation, &config.normal)?;
                let prob = samples.probability_variation_better();
                let differences = samples.differences();
                let histogram = Histogram::new(
                    &[("control", &samples.control), ("variation", &samples.variation)],
                    config.bins,
                )?
                .with_marker("control mean", control.rpv)
                .with_marker("variation mean", variation.rpv);
                let analytic = analytic_probability(control, variation);
                (
                    prob,
                    differences,
                    histogram,
                    None,
                    SampleDistributions::Independent(samples),
                    Some(analytic),
                )
            }
            SamplingMethod::Mcmc => {
                let model = RpvModel::from_metrics(control, variation);
                let trace = sample_posterior(&model, &config.mcmc, progress)?;
                let prob = trace.probability_variation_better();
                let differences = trace.diff();
                let histogram =
                    Histogram::spanning(&[("difference", &differences)], config.bins, &[0.0])?
                        .with_marker("no difference", 0.0);
                let diagnostics = diagnose(&trace);
                if !diagnostics.is_converged() {
                    for p in diagnostics.parameters.iter().filter(|p| !p.is_converged()) {
                        tracing::warn!(
                            parameter = p.name,
                            r_hat = p.r_hat,
                            ess = p.effective_samples,
                            "chains may not have converged"
                        );
                    }
                }
                (
                    prob,
                    differences,
                    histogram,
                    Some(diagnostics),
                    SampleDistributions::Posterior(trace),
                    None,
                )
            }
        };

    let difference = compute_summary(&differences);
    let credible_interval = credible_interval(&differences, config.credible_level);
    let relative_uplift = (variation.rpv - control.rpv) / control.rpv * 100.0;
    let verdict = Verdict::from_probability(prob_variation_better);
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    tracing::debug!(
        prob_variation_better,
        draws = distributions.sample_count(),
        duration_ms,
        "comparison complete"
    );

    Ok(ComparisonResult {
        method: config.method,
        control: *control,
        variation: *variation,
        prob_variation_better,
        analytic_probability: analytic,
        difference,
        credible_interval,
        relative_uplift,
        verdict,
        histogram,
        diagnostics,
        distributions,
        duration_ms,
    })
}
