//! Report Data Structures

use chrono::{DateTime, Utc};
use rpvlab_stats::{
    ComparisonResult, GroupMetrics, Histogram, McmcDiagnostics, ParameterDiagnostics,
    SamplingMethod, Verdict,
};
use serde::{Deserialize, Serialize};

/// Current report schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Complete RPV comparison report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub control: GroupReport,
    pub variation: GroupReport,
    pub probability: ProbabilityReport,
    pub difference: DifferenceReport,
    pub verdict: VerdictReport,
    /// Omitted when histogram output is disabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<HistogramReport>,
    /// MCMC only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<DiagnosticsReport>,
}

impl Report {
    /// Build a report from a computed comparison
    pub fn from_result(meta: ReportMeta, result: &ComparisonResult, with_histogram: bool) -> Self {
        Self {
            meta,
            control: GroupReport::from(&result.control),
            variation: GroupReport::from(&result.variation),
            probability: ProbabilityReport {
                variation_better: result.prob_variation_better,
                variation_not_better: 1.0 - result.prob_variation_better,
                analytic: result.analytic_probability,
                sample_count: result.distributions.sample_count(),
            },
            difference: DifferenceReport {
                mean: result.difference.mean,
                median: result.difference.median,
                std_dev: result.difference.std_dev,
                relative_uplift_pct: result.relative_uplift,
                ci_lower: result.credible_interval.lower,
                ci_upper: result.credible_interval.upper,
                ci_level: result.credible_interval.level,
            },
            verdict: VerdictReport::from(result.verdict),
            histogram: with_histogram.then(|| HistogramReport::from(&result.histogram)),
            diagnostics: result.diagnostics.as_ref().map(DiagnosticsReport::from),
        }
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: f64,
    pub system: SystemInfo,
    pub config: ReportConfig,
}

/// Sampler configuration captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub method: SamplingMethod,
    pub seed: u64,
    /// Normal method draws per group
    pub samples: usize,
    /// MCMC draws per chain
    pub draws: usize,
    pub tune: usize,
    pub chains: usize,
    pub credible_level: f64,
    pub bins: usize,
}

/// System information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub os: String,
    pub arch: String,
    pub cpu_cores: u32,
    pub threads: usize,
}

/// One group's derived metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupReport {
    pub sessions: u64,
    pub revenue: f64,
    pub rpv: f64,
    pub standard_error: f64,
    /// True when RPV was given manually instead of derived
    pub rpv_overridden: bool,
}

impl From<&GroupMetrics> for GroupReport {
    fn from(m: &GroupMetrics) -> Self {
        Self {
            sessions: m.sessions,
            revenue: m.revenue,
            rpv: m.rpv,
            standard_error: m.standard_error,
            rpv_overridden: m.rpv_overridden,
        }
    }
}

/// Probability of improvement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbabilityReport {
    /// Empirical P(variation > control)
    pub variation_better: f64,
    /// `1 - variation_better`; tied draws count here
    pub variation_not_better: f64,
    /// Closed-form value, Normal method only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytic: Option<f64>,
    pub sample_count: usize,
}

/// The `variation - control` distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifferenceReport {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub relative_uplift_pct: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub ci_level: f64,
}

/// Verdict with its display text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictReport {
    pub verdict: Verdict,
    pub headline: String,
    pub explanation: String,
}

impl From<Verdict> for VerdictReport {
    fn from(verdict: Verdict) -> Self {
        Self {
            verdict,
            headline: verdict.headline().to_string(),
            explanation: verdict.explanation().to_string(),
        }
    }
}

/// Binned distributions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramReport {
    pub edges: Vec<f64>,
    pub series: Vec<SeriesReport>,
    pub markers: Vec<MarkerReport>,
}

/// One binned series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesReport {
    pub label: String,
    pub counts: Vec<u64>,
    pub density: Vec<f64>,
}

/// Reference line on the value axis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerReport {
    pub label: String,
    pub value: f64,
}

impl From<&Histogram> for HistogramReport {
    fn from(h: &Histogram) -> Self {
        Self {
            edges: h.edges.clone(),
            series: h
                .series
                .iter()
                .map(|s| SeriesReport {
                    label: s.label.clone(),
                    counts: s.counts.clone(),
                    density: s.density.clone(),
                })
                .collect(),
            markers: h
                .markers
                .iter()
                .map(|m| MarkerReport {
                    label: m.label.clone(),
                    value: m.value,
                })
                .collect(),
        }
    }
}

/// MCMC convergence diagnostics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsReport {
    pub chains: usize,
    pub draws_per_chain: usize,
    pub tune: usize,
    pub converged: bool,
    pub parameters: Vec<ParameterReport>,
}

/// Diagnostics for one sampled parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterReport {
    pub name: String,
    pub r_hat: f64,
    pub ess: f64,
    /// Mean across chains
    pub acceptance_rate: f64,
    /// Mean across chains
    pub step_size: f64,
}

impl From<&ParameterDiagnostics> for ParameterReport {
    fn from(p: &ParameterDiagnostics) -> Self {
        Self {
            name: p.name.to_string(),
            r_hat: p.r_hat,
            ess: p.effective_samples,
            acceptance_rate: p.acceptance_rate,
            step_size: p.step_size,
        }
    }
}

impl From<&McmcDiagnostics> for DiagnosticsReport {
    fn from(d: &McmcDiagnostics) -> Self {
        Self {
            chains: d.chains,
            draws_per_chain: d.draws_per_chain,
            tune: d.tune,
            converged: d.is_converged(),
            parameters: d.parameters.iter().map(ParameterReport::from).collect(),
        }
    }
}
