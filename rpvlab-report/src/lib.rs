#![warn(missing_docs)]
//! rpvlab Report - Output Generation
//!
//! Turns a comparison result into a serializable [`Report`] and renders it:
//! - JSON (machine-readable)
//! - Markdown (table summary)
//!
//! Human terminal output lives in the CLI, next to its histogram renderer.

mod json;
mod markdown;
mod report;

pub use json::generate_json_report;
pub use markdown::generate_markdown_report;
pub use report::{
    DiagnosticsReport, DifferenceReport, GroupReport, HistogramReport, MarkerReport,
    ParameterReport, ProbabilityReport, Report, ReportConfig, ReportMeta, SCHEMA_VERSION,
    SeriesReport, SystemInfo, VerdictReport,
};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JSON with full schema
    Json,
    /// Markdown tables
    Markdown,
    /// Human-readable terminal output
    #[default]
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rpvlab_stats::{
        ComparisonConfig, GroupInput, McmcConfig, SamplingMethod, compute, derive_metrics,
    };

    fn report_for(config: &ComparisonConfig, with_histogram: bool) -> Report {
        let control = derive_metrics(&GroupInput::new(14403, 803801.41)).unwrap();
        let variation = derive_metrics(&GroupInput::new(13913, 838703.13)).unwrap();
        let result = compute(&control, &variation, config).unwrap();

        let meta = ReportMeta {
            schema_version: SCHEMA_VERSION,
            version: "0.1.0".to_string(),
            timestamp: Utc::now(),
            duration_ms: result.duration_ms,
            system: SystemInfo {
                os: "linux".to_string(),
                arch: "x86_64".to_string(),
                cpu_cores: 4,
                threads: 4,
            },
            config: ReportConfig {
                method: config.method,
                seed: config.normal.seed,
                samples: config.normal.samples,
                draws: config.mcmc.draws,
                tune: config.mcmc.tune,
                chains: config.mcmc.chains,
                credible_level: config.credible_level,
                bins: config.bins,
            },
        };
        Report::from_result(meta, &result, with_histogram)
    }

    fn small_mcmc() -> ComparisonConfig {
        ComparisonConfig {
            method: SamplingMethod::Mcmc,
            mcmc: McmcConfig {
                draws: 2_000,
                tune: 500,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("MD".parse::<OutputFormat>(), Ok(OutputFormat::Markdown));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Human));
        assert!("html".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_json_report_fields() {
        let report = report_for(&ComparisonConfig::default(), true);
        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["meta"]["config"]["method"], "normal");
        assert_eq!(value["verdict"]["verdict"], "high-chance");
        assert_eq!(value["control"]["sessions"], 14403);
        assert!(value["probability"]["analytic"].is_number());
        assert_eq!(value["histogram"]["series"].as_array().unwrap().len(), 2);
        assert!(value.get("diagnostics").is_none());
    }

    #[test]
    fn test_probability_complement() {
        let report = report_for(&ComparisonConfig::default(), false);
        let p = &report.probability;
        assert!((p.variation_better + p.variation_not_better - 1.0).abs() < 1e-12);

        let value: serde_json::Value =
            serde_json::from_str(&generate_json_report(&report).unwrap()).unwrap();
        assert!(value["probability"]["variation_not_better"].is_number());
        assert!(value["probability"].get("control_better").is_none());
    }

    #[test]
    fn test_json_without_histogram() {
        let report = report_for(&ComparisonConfig::default(), false);
        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("histogram").is_none());
    }

    #[test]
    fn test_json_roundtrips_into_report() {
        let report = report_for(&ComparisonConfig::default(), false);
        let json = generate_json_report(&report).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.verdict.verdict, report.verdict.verdict);
        assert_eq!(parsed.meta.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_mcmc_report_has_diagnostics() {
        let report = report_for(&small_mcmc(), true);
        let diag = report.diagnostics.as_ref().unwrap();
        assert_eq!(diag.parameters.len(), 2);
        assert_eq!(diag.parameters[0].name, "mu_control");
        assert!(report.probability.analytic.is_none());

        let hist = report.histogram.as_ref().unwrap();
        assert_eq!(hist.series.len(), 1);
        assert_eq!(hist.markers[0].label, "no difference");
    }

    #[test]
    fn test_markdown_report() {
        let md = generate_markdown_report(&report_for(&ComparisonConfig::default(), false), "R$");

        assert!(md.starts_with("## RPV A/B Test (normal)"));
        assert!(md.contains("| Control | 14403 | R$ 803801.41 | R$ 55.81 |"));
        assert!(md.contains("| Variation | 13913 | R$ 838703.13 | R$ 60.28 |"));
        assert!(md.contains("high chance, consider shipping"));
        assert!(md.contains("Closed-form probability"));
        assert!(!md.contains("Diagnostics"));
    }

    #[test]
    fn test_markdown_mcmc_diagnostics() {
        let md = generate_markdown_report(&report_for(&small_mcmc(), false), "$");
        assert!(md.contains("### Diagnostics (2 chains x 2000 draws, 500 tuning)"));
        assert!(md.contains("| mu_variation |"));
    }
}
