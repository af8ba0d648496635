#![warn(missing_docs)]
//! rpvlab Statistical Engine
//!
//! Bayesian comparison of revenue per visit (RPV) between a control and a
//! variation group:
//! - Metric derivation with the `rpv / sqrt(sessions)` standard error
//! - Normal-approximation Monte Carlo sampling
//! - Metropolis MCMC posterior sampling with R-hat and ESS diagnostics
//! - Credible intervals, histograms and a strict-threshold verdict

mod comparison;
mod diagnostics;
mod error;
mod histogram;
mod mcmc;
mod metrics;
mod normal;
mod percentiles;
mod summary;
mod verdict;

pub use comparison::{
    ComparisonConfig, ComparisonError, ComparisonResult, SampleDistributions, SamplingMethod,
    compute, compute_with_progress,
};
pub use diagnostics::{
    MIN_EFFECTIVE_SAMPLES, McmcDiagnostics, ParameterDiagnostics, RHAT_THRESHOLD, diagnose,
    effective_sample_size, split_rhat,
};
pub use error::SamplerError;
pub use histogram::{DEFAULT_BINS, Histogram, HistogramError, HistogramSeries, Marker};
pub use mcmc::{
    ChainProgress, ChainTrace, McmcConfig, NormalPrior, PARAMETER_NAMES, PosteriorTrace,
    RpvModel, sample_posterior,
};
pub use metrics::{
    GroupInput, GroupMetrics, MIN_REVENUE, MIN_RPV, MIN_SESSIONS, MetricsError, derive_metrics,
    standard_error,
};
pub use normal::{
    NormalConfig, NormalSamples, analytic_probability, probability_greater, sample_normal,
};
pub use percentiles::{CredibleInterval, compute_percentile, credible_interval};
pub use summary::{SummaryStatistics, compute_summary};
pub use verdict::{
    GOOD_CHANCE_THRESHOLD, HIGH_CHANCE_THRESHOLD, INCONCLUSIVE_THRESHOLD, Verdict,
};

/// Default number of Normal-approximation draws per group
pub const DEFAULT_NORMAL_SAMPLES: usize = 100_000;

/// Default random seed
pub const DEFAULT_SEED: u64 = 42;

/// Default MCMC draws per chain
pub const DEFAULT_DRAWS: usize = 10_000;

/// Default MCMC tuning steps per chain (discarded)
pub const DEFAULT_TUNE: usize = 1_000;

/// Default number of MCMC chains
pub const DEFAULT_CHAINS: usize = 2;

/// Default Metropolis acceptance rate the tuner aims for
pub const DEFAULT_TARGET_ACCEPTANCE: f64 = 0.44;

/// Default credible level (95%)
pub const DEFAULT_CREDIBLE_LEVEL: f64 = 0.95;
