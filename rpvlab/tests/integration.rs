//! Integration tests for rpvlab
//!
//! These tests verify the end-to-end behavior of the calculator.

use clap::Parser;
use rpvlab::{
    Cli, ComparisonConfig, GroupInput, McmcConfig, RpvConfig, SamplingMethod, Verdict, compute,
    derive_metrics,
};
use rpvlab_cli::{build_comparison_config, execute};

fn reference_groups() -> (rpvlab::GroupMetrics, rpvlab::GroupMetrics) {
    (
        derive_metrics(&GroupInput::new(14403, 803801.41)).unwrap(),
        derive_metrics(&GroupInput::new(13913, 838703.13)).unwrap(),
    )
}

/// The default inputs give RPVs of 55.81 and 60.28 and a decisive win
#[test]
fn test_reference_inputs_normal() {
    let (control, variation) = reference_groups();
    assert!((control.rpv - 55.8078).abs() < 1e-3);
    assert!((variation.rpv - 60.2820).abs() < 1e-3);

    let result = compute(&control, &variation, &ComparisonConfig::default()).unwrap();
    assert!(result.prob_variation_better > 0.95);
    assert_eq!(result.verdict, Verdict::HighChance);

    // Sampled probability tracks the closed form
    let analytic = result.analytic_probability.unwrap();
    assert!((result.prob_variation_better - analytic).abs() < 0.005);
}

/// Same seed, same inputs, same answer
#[test]
fn test_seeded_runs_are_reproducible() {
    let (control, variation) = reference_groups();
    let config = ComparisonConfig::default();
    let a = compute(&control, &variation, &config).unwrap();
    let b = compute(&control, &variation, &config).unwrap();
    assert_eq!(a.prob_variation_better, b.prob_variation_better);

    let mcmc = ComparisonConfig {
        method: SamplingMethod::Mcmc,
        mcmc: McmcConfig {
            draws: 2_000,
            ..Default::default()
        },
        ..Default::default()
    };
    let a = compute(&control, &variation, &mcmc).unwrap();
    let b = compute(&control, &variation, &mcmc).unwrap();
    assert_eq!(a.prob_variation_better, b.prob_variation_better);
}

/// Both methods agree on the reference inputs
#[test]
fn test_methods_agree() {
    let (control, variation) = reference_groups();
    let config = ComparisonConfig {
        method: SamplingMethod::Mcmc,
        ..Default::default()
    };
    let result = compute(&control, &variation, &config).unwrap();

    assert_eq!(result.verdict, Verdict::HighChance);
    let diagnostics = result.diagnostics.unwrap();
    assert!(diagnostics.is_converged(), "{:?}", diagnostics);
    assert_eq!(
        result.histogram.series[0].total() as usize,
        diagnostics.chains * diagnostics.draws_per_chain
    );
}

/// Probability stays within [0, 1] across a spread of inputs
#[test]
fn test_probability_bounds() {
    let cases = [
        ((1, 0.01), (1, 0.01)),
        ((10, 100.0), (10_000, 1_000_000.0)),
        ((50_000, 10.0), (50_000, 20.0)),
    ];
    for ((cs, cr), (vs, vr)) in cases {
        let control = derive_metrics(&GroupInput::new(cs, cr)).unwrap();
        let variation = derive_metrics(&GroupInput::new(vs, vr)).unwrap();
        let result = compute(&control, &variation, &ComparisonConfig::default()).unwrap();
        assert!((0.0..=1.0).contains(&result.prob_variation_better));
    }
}

/// A manual RPV below the observed value flips the verdict
#[test]
fn test_manual_rpv_override() {
    let control = derive_metrics(&GroupInput::new(14403, 803801.41)).unwrap();
    let variation = derive_metrics(&GroupInput::new(13913, 838703.13).with_rpv(50.0)).unwrap();
    assert!(variation.rpv_overridden);

    let result = compute(&control, &variation, &ComparisonConfig::default()).unwrap();
    assert_eq!(result.verdict, Verdict::ControlBest);
    assert!(result.relative_uplift < 0.0);
}

/// CLI flags through to JSON output
#[test]
fn test_cli_json_end_to_end() {
    let cli = Cli::try_parse_from([
        "rpvlab",
        "--format",
        "json",
        "--method",
        "mcmc",
        "--draws",
        "1000",
        "--tune",
        "200",
    ])
    .unwrap();
    let config = RpvConfig::default();
    let comparison = build_comparison_config(&cli, &config).unwrap();

    let output = execute(&cli, &config, &comparison).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["meta"]["config"]["method"], "mcmc");
    assert_eq!(value["diagnostics"]["chains"], 2);
    assert_eq!(value["diagnostics"]["draws_per_chain"], 1000);
    assert_eq!(value["histogram"]["markers"][0]["value"], 0.0);
}

/// Markdown output honours the configured currency
#[test]
fn test_cli_markdown_currency() {
    let cli = Cli::try_parse_from(["rpvlab", "--format", "markdown", "-n", "10000"]).unwrap();
    let mut config = RpvConfig::default();
    config.output.currency = "US$".to_string();
    let comparison = build_comparison_config(&cli, &config).unwrap();

    let output = execute(&cli, &config, &comparison).unwrap();
    assert!(output.contains("US$ 55.81"));
    assert!(!output.contains("R$"));
}

/// Config file values load from disk
#[test]
fn test_config_file_loading() {
    let dir = std::env::temp_dir().join(format!("rpvlab-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("rpvlab.toml");
    std::fs::write(&path, "[sampler]\nmethod = \"mcmc\"\nchains = 4\n").unwrap();

    let config = RpvConfig::load(&path).unwrap();
    assert_eq!(config.sampler.method, "mcmc");
    assert_eq!(config.sampler.chains, 4);
    assert_eq!(RpvConfig::find(&dir), Some(path.clone()));

    std::fs::remove_dir_all(&dir).unwrap();
}
