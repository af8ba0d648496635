#![warn(missing_docs)]
//! # rpvlab
//!
//! Bayesian A/B test calculator for revenue per visit (RPV).
//!
//! Given sessions and total revenue for a control and a variation group,
//! rpvlab estimates the probability that the variation's RPV is higher:
//! - **Normal approximation**: 100,000 seeded draws per group from
//!   `N(RPV, RPV / sqrt(sessions))`
//! - **MCMC**: random-walk Metropolis over the two group means, with split-R̂
//!   and effective sample size diagnostics
//! - **Verdict**: strict thresholds at 95%, 75% and 55%
//! - **Output**: terminal text with an ASCII histogram, JSON, or Markdown
//!
//! ## Library Use
//!
//! ```
//! use rpvlab::{ComparisonConfig, GroupInput, Verdict, compute, derive_metrics};
//!
//! let control = derive_metrics(&GroupInput::new(14403, 803801.41)).unwrap();
//! let variation = derive_metrics(&GroupInput::new(13913, 838703.13)).unwrap();
//!
//! let result = compute(&control, &variation, &ComparisonConfig::default()).unwrap();
//! assert_eq!(result.verdict, Verdict::HighChance);
//! ```

// Re-export stats
pub use rpvlab_stats::{
    ComparisonConfig, ComparisonError, ComparisonResult, CredibleInterval, GroupInput,
    GroupMetrics, Histogram, McmcConfig, McmcDiagnostics, MetricsError, NormalConfig,
    SamplingMethod, Verdict, compute, compute_with_progress, derive_metrics,
};

// Re-export report types
pub use rpvlab_report::{
    OutputFormat, Report, generate_json_report, generate_markdown_report,
};

// Re-export CLI building blocks
pub use rpvlab_cli::{Cli, Commands, RpvConfig};

/// Run the rpvlab CLI.
///
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     rpvlab::run()
/// }
/// ```
pub use rpvlab_cli::run;
