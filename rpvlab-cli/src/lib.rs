#![warn(missing_docs)]
//! rpvlab CLI Library
//!
//! Command-line front end for the Bayesian RPV calculator. Every invocation
//! derives both groups' metrics, samples, and prints one report to stdout.
//! Logs and the MCMC progress bar go to stderr.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     rpvlab_cli::run()
//! }
//! ```

mod config;
mod executor;

pub use config::*;
pub use executor::{
    AnalysisInputs, HumanOptions, ProgressBarReporter, build_report, format_human_output,
    methodology_text, render_histogram, run_analysis,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use rayon::ThreadPoolBuilder;
use rpvlab_report::{OutputFormat, generate_json_report, generate_markdown_report};
use rpvlab_stats::{
    ComparisonConfig, GroupInput, McmcConfig, NormalConfig, SamplingMethod,
};
use std::path::PathBuf;

/// Default control sessions
pub const DEFAULT_CONTROL_SESSIONS: u64 = 14403;
/// Default control revenue
pub const DEFAULT_CONTROL_REVENUE: f64 = 803801.41;
/// Default variation sessions
pub const DEFAULT_VARIATION_SESSIONS: u64 = 13913;
/// Default variation revenue
pub const DEFAULT_VARIATION_REVENUE: f64 = 838703.13;

/// rpvlab CLI arguments
#[derive(Parser, Debug)]
#[command(name = "rpvlab")]
#[command(author, version, about = "rpvlab - Bayesian A/B test calculator for revenue per visit")]
pub struct Cli {
    /// Optional subcommand (Run, Methodology, InitConfig); defaults to Run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Sampling method: normal, mcmc
    #[arg(long, global = true)]
    pub method: Option<String>,

    /// Control group sessions
    #[arg(long, global = true, default_value_t = DEFAULT_CONTROL_SESSIONS)]
    pub control_sessions: u64,

    /// Control group total revenue
    #[arg(long, global = true, default_value_t = DEFAULT_CONTROL_REVENUE)]
    pub control_revenue: f64,

    /// Manual control RPV (replaces revenue / sessions)
    #[arg(long, global = true)]
    pub control_rpv: Option<f64>,

    /// Variation group sessions
    #[arg(long, global = true, default_value_t = DEFAULT_VARIATION_SESSIONS)]
    pub variation_sessions: u64,

    /// Variation group total revenue
    #[arg(long, global = true, default_value_t = DEFAULT_VARIATION_REVENUE)]
    pub variation_revenue: f64,

    /// Manual variation RPV (replaces revenue / sessions)
    #[arg(long, global = true)]
    pub variation_rpv: Option<f64>,

    /// Normal method draws per group
    #[arg(long, short = 'n', global = true)]
    pub samples: Option<usize>,

    /// MCMC retained draws per chain
    #[arg(long, global = true)]
    pub draws: Option<usize>,

    /// MCMC tuning steps per chain
    #[arg(long, global = true)]
    pub tune: Option<usize>,

    /// MCMC chains
    #[arg(long, global = true)]
    pub chains: Option<usize>,

    /// Random seed
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Histogram bins
    #[arg(long, global = true)]
    pub bins: Option<usize>,

    /// Output format: human, json, markdown
    #[arg(long, global = true)]
    pub format: Option<String>,

    /// Leave the histogram out of the output
    #[arg(long, global = true)]
    pub no_histogram: bool,

    /// Configuration file (default: discover rpvlab.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of threads for MCMC chains
    /// 0 = use all available cores (default)
    #[arg(long, short = 'j', global = true, default_value = "0")]
    pub threads: usize,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the comparison (default)
    Run,
    /// Explain how the calculation is done
    Methodology,
    /// Print a default rpvlab.toml
    InitConfig,
}

/// Run the rpvlab CLI with the process arguments.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the rpvlab CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    if cli.command == Some(Commands::InitConfig) {
        print!("{}", RpvConfig::default_toml());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let comparison = build_comparison_config(&cli, &config)?;

    match cli.command {
        Some(Commands::Methodology) => {
            print!(
                "{}",
                methodology_text(comparison.method, &comparison.normal, &comparison.mcmc)
            );
        }
        _ => {
            if cli.threads > 0 {
                ThreadPoolBuilder::new()
                    .num_threads(cli.threads)
                    .build_global()
                    .ok();
            }
            let output = execute(&cli, &config, &comparison)?;
            print!("{}", output);
        }
    }

    Ok(())
}

/// Install the stderr log subscriber; repeated calls keep the first one
fn init_logging(verbose: bool) {
    let filter = if verbose { "rpvlab=debug" } else { "rpvlab=info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// `--config` if given, else a discovered rpvlab.toml, else defaults
fn load_config(cli: &Cli) -> anyhow::Result<RpvConfig> {
    match &cli.config {
        Some(path) => RpvConfig::load(path),
        None => Ok(RpvConfig::discover()?.unwrap_or_default()),
    }
}

/// Build a ComparisonConfig by layering: rpvlab.toml values → CLI overrides.
pub fn build_comparison_config(cli: &Cli, config: &RpvConfig) -> anyhow::Result<ComparisonConfig> {
    let sampler = &config.sampler;
    let method: SamplingMethod = cli
        .method
        .as_deref()
        .unwrap_or(sampler.method.as_str())
        .parse()
        .map_err(anyhow::Error::msg)?;
    let seed = cli.seed.unwrap_or(sampler.seed);

    Ok(ComparisonConfig {
        method,
        normal: NormalConfig {
            samples: cli.samples.unwrap_or(sampler.samples),
            seed,
        },
        mcmc: McmcConfig {
            draws: cli.draws.unwrap_or(sampler.draws),
            tune: cli.tune.unwrap_or(sampler.tune),
            chains: cli.chains.unwrap_or(sampler.chains),
            seed,
            target_acceptance: sampler.target_acceptance,
        },
        credible_level: config.credible.level,
        bins: cli.bins.unwrap_or(config.output.bins),
    })
}

/// Both groups' inputs from the command line
pub fn analysis_inputs(cli: &Cli) -> AnalysisInputs {
    let group = |sessions, revenue, rpv: Option<f64>| {
        let input = GroupInput::new(sessions, revenue);
        match rpv {
            Some(rpv) => input.with_rpv(rpv),
            None => input,
        }
    };
    AnalysisInputs {
        control: group(cli.control_sessions, cli.control_revenue, cli.control_rpv),
        variation: group(cli.variation_sessions, cli.variation_revenue, cli.variation_rpv),
    }
}

/// Run the comparison and render it in the selected format
pub fn execute(
    cli: &Cli,
    config: &RpvConfig,
    comparison: &ComparisonConfig,
) -> anyhow::Result<String> {
    let format: OutputFormat = cli
        .format
        .as_deref()
        .unwrap_or(config.output.format.as_str())
        .parse()
        .map_err(anyhow::Error::msg)?;
    let with_histogram = config.output.show_histogram && !cli.no_histogram;

    let inputs = analysis_inputs(cli);
    let result = run_analysis(&inputs, comparison, format == OutputFormat::Human)?;
    let report = build_report(&result, comparison, with_histogram);

    let output = match format {
        OutputFormat::Json => generate_json_report(&report).context("failed to serialize report")?,
        OutputFormat::Markdown => generate_markdown_report(&report, &config.output.currency),
        OutputFormat::Human => format_human_output(
            &report,
            &HumanOptions {
                currency: config.output.currency.clone(),
                histogram_width: config.output.histogram_width,
                histogram_height: config.output.histogram_height,
            },
        ),
    };
    Ok(output)
}
