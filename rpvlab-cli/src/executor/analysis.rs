//! Analysis Execution
//!
//! Validates the two groups and runs the selected sampler. MCMC runs report
//! progress through an indicatif bar on stderr.

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use rpvlab_stats::{
    ChainProgress, ComparisonConfig, ComparisonResult, GroupInput, SamplingMethod,
    compute_with_progress, derive_metrics,
};

/// Raw inputs for both groups
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisInputs {
    /// Control group
    pub control: GroupInput,
    /// Variation group
    pub variation: GroupInput,
}

/// Forwards chain progress to an indicatif bar
pub struct ProgressBarReporter {
    bar: ProgressBar,
}

impl ProgressBarReporter {
    /// Visible bar sized for the whole MCMC run
    pub fn new(total_steps: u64) -> Self {
        let bar = ProgressBar::new(total_steps);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message("sampling");
        Self { bar }
    }

    /// Bar that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Position reached so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ChainProgress for ProgressBarReporter {
    fn advance(&self, steps: u64) {
        self.bar.inc(steps);
    }
}

/// Derive both groups' metrics and run the comparison
///
/// A progress bar is drawn for MCMC runs when `show_progress` is set.
pub fn run_analysis(
    inputs: &AnalysisInputs,
    config: &ComparisonConfig,
    show_progress: bool,
) -> anyhow::Result<ComparisonResult> {
    let control = derive_metrics(&inputs.control).context("invalid control group")?;
    let variation = derive_metrics(&inputs.variation).context("invalid variation group")?;

    tracing::info!(
        method = %config.method,
        rpv_control = control.rpv,
        rpv_variation = variation.rpv,
        "running comparison"
    );
    if control.rpv_overridden || variation.rpv_overridden {
        tracing::debug!(
            control_observed = control.observed_rpv(),
            variation_observed = variation.observed_rpv(),
            "using manual RPV"
        );
    }

    let progress = if show_progress && config.method == SamplingMethod::Mcmc {
        ProgressBarReporter::new(config.mcmc.total_steps())
    } else {
        ProgressBarReporter::hidden()
    };

    let result = compute_with_progress(&control, &variation, config, &progress);
    progress.finish();
    let result = result.context("comparison failed")?;

    tracing::info!(
        prob_variation_better = result.prob_variation_better,
        verdict = ?result.verdict,
        duration_ms = result.duration_ms,
        "comparison finished"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpvlab_stats::{McmcConfig, Verdict};

    fn default_inputs() -> AnalysisInputs {
        AnalysisInputs {
            control: GroupInput::new(14403, 803801.41),
            variation: GroupInput::new(13913, 838703.13),
        }
    }

    #[test]
    fn test_run_normal_analysis() {
        let result = run_analysis(&default_inputs(), &ComparisonConfig::default(), false).unwrap();
        assert_eq!(result.verdict, Verdict::HighChance);
        assert_eq!(result.control.sessions, 14403);
    }

    #[test]
    fn test_invalid_group_is_reported() {
        let inputs = AnalysisInputs {
            control: GroupInput::new(0, 100.0),
            ..default_inputs()
        };
        let err = run_analysis(&inputs, &ComparisonConfig::default(), false).unwrap_err();
        assert!(err.to_string().contains("control"));
    }

    #[test]
    fn test_progress_reporter_counts_steps() {
        let config = ComparisonConfig {
            method: SamplingMethod::Mcmc,
            mcmc: McmcConfig {
                draws: 500,
                tune: 100,
                ..Default::default()
            },
            ..Default::default()
        };
        let control = derive_metrics(&default_inputs().control).unwrap();
        let variation = derive_metrics(&default_inputs().variation).unwrap();

        let reporter = ProgressBarReporter::hidden();
        compute_with_progress(&control, &variation, &config, &reporter).unwrap();
        assert_eq!(reporter.position(), config.mcmc.total_steps());
    }
}
