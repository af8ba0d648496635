//! Run Metadata Collection
//!
//! Collects the run configuration and host details stored in report metadata.

use chrono::Utc;
use rpvlab_report::{ReportConfig, ReportMeta, SCHEMA_VERSION, SystemInfo};
use rpvlab_stats::{ComparisonConfig, SamplingMethod};

/// Build report metadata for a finished comparison
pub fn build_report_meta(config: &ComparisonConfig, duration_ms: f64) -> ReportMeta {
    let system = SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu_cores: num_cpus(),
        threads: rayon::current_num_threads(),
    };

    let seed = match config.method {
        SamplingMethod::Normal => config.normal.seed,
        SamplingMethod::Mcmc => config.mcmc.seed,
    };

    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        duration_ms,
        system,
        config: ReportConfig {
            method: config.method,
            seed,
            samples: config.normal.samples,
            draws: config.mcmc.draws,
            tune: config.mcmc.tune,
            chains: config.mcmc.chains,
            credible_level: config.credible_level,
            bins: config.bins,
        },
    }
}

/// Get number of available CPU cores
fn num_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}
