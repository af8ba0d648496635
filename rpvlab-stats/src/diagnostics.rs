//! MCMC Convergence Diagnostics
//!
//! - Split-R̂ (Gelman-Rubin potential scale reduction on half-chains)
//! - Effective sample size via autocorrelation with Geyer's initial positive
//!   sequence truncation
//!
//! Both take a set of equal-length chains for one parameter.

use crate::mcmc::{PARAMETER_NAMES, PosteriorTrace};

/// R̂ above this value indicates the chains have not mixed
pub const RHAT_THRESHOLD: f64 = 1.01;

/// Minimum effective sample size considered reliable
pub const MIN_EFFECTIVE_SAMPLES: f64 = 400.0;

/// Diagnostics for one model parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDiagnostics {
    /// Parameter name
    pub name: &'static str,
    /// Split-R̂
    pub r_hat: f64,
    /// Effective sample size over all chains
    pub effective_samples: f64,
    /// Mean acceptance rate over chains
    pub acceptance_rate: f64,
    /// Mean tuned proposal scale over chains
    pub step_size: f64,
}

impl ParameterDiagnostics {
    /// Whether R̂ and ESS are both within limits
    pub fn is_converged(&self) -> bool {
        self.r_hat < RHAT_THRESHOLD && self.effective_samples >= MIN_EFFECTIVE_SAMPLES
    }
}

/// Diagnostics for a complete trace
#[derive(Debug, Clone, PartialEq)]
pub struct McmcDiagnostics {
    /// Number of chains
    pub chains: usize,
    /// Retained draws per chain
    pub draws_per_chain: usize,
    /// Discarded tuning steps per chain
    pub tune: usize,
    /// Per-parameter diagnostics, in model order
    pub parameters: Vec<ParameterDiagnostics>,
}

impl McmcDiagnostics {
    /// Whether every parameter passed
    pub fn is_converged(&self) -> bool {
        self.parameters.iter().all(ParameterDiagnostics::is_converged)
    }
}

/// Compute diagnostics for every parameter of a trace
pub fn diagnose(trace: &PosteriorTrace) -> McmcDiagnostics {
    let n_chains = trace.chains.len().max(1) as f64;

    let parameters = PARAMETER_NAMES
        .iter()
        .enumerate()
        .map(|(p, &name)| {
            let chains: Vec<&[f64]> = trace.chains.iter().map(|c| c.parameter(p)).collect();
            ParameterDiagnostics {
                name,
                r_hat: split_rhat(&chains),
                effective_samples: effective_sample_size(&chains),
                acceptance_rate: trace.chains.iter().map(|c| c.acceptance_rate[p]).sum::<f64>()
                    / n_chains,
                step_size: trace.chains.iter().map(|c| c.step_size[p]).sum::<f64>() / n_chains,
            }
        })
        .collect();

    McmcDiagnostics {
        chains: trace.chains.len(),
        draws_per_chain: trace.draws_per_chain(),
        tune: trace.tune,
        parameters,
    }
}

/// Split-R̂ for one parameter
///
/// Each chain is split into a first and last half of equal length (the
/// middle draw is dropped for odd lengths). Returns 1.0 when there is no
/// within-chain variance, and NaN when the halves hold fewer than two draws.
pub fn split_rhat(chains: &[&[f64]]) -> f64 {
    let n = chains.iter().map(|c| c.len()).min().unwrap_or(0) / 2;
    if n < 2 {
        return f64::NAN;
    }

    let halves: Vec<&[f64]> = chains
        .iter()
        .flat_map(|&c| [&c[..n], &c[c.len() - n..]])
        .collect();

    let m = halves.len() as f64;
    let nf = n as f64;
    let means: Vec<f64> = halves.iter().map(|h| mean(h)).collect();
    let within = halves
        .iter()
        .zip(&means)
        .map(|(h, &mu)| h.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / (nf - 1.0))
        .sum::<f64>()
        / m;
    if within <= 0.0 {
        return 1.0;
    }

    let grand = mean(&means);
    let between = nf * means.iter().map(|mu| (mu - grand).powi(2)).sum::<f64>() / (m - 1.0);
    let var_plus = (nf - 1.0) / nf * within + between / nf;

    (var_plus / within).sqrt()
}

/// Effective sample size for one parameter across chains
///
/// Uses the multi-chain autocorrelation estimate
/// `ρ_t = 1 - (W - mean_c γ_c(t)) / var⁺`, summed in pairs while the pair sum
/// stays positive.
pub fn effective_sample_size(chains: &[&[f64]]) -> f64 {
    let n = chains.iter().map(|c| c.len()).min().unwrap_or(0);
    if n < 4 || chains.is_empty() {
        return 0.0;
    }
    let chains: Vec<&[f64]> = chains.iter().map(|&c| &c[..n]).collect();
    let m = chains.len() as f64;
    let nf = n as f64;

    let means: Vec<f64> = chains.iter().map(|c| mean(c)).collect();
    let autocov = |lag: usize| -> f64 {
        chains
            .iter()
            .zip(&means)
            .map(|(c, &mu)| {
                c[..n - lag]
                    .iter()
                    .zip(&c[lag..])
                    .map(|(a, b)| (a - mu) * (b - mu))
                    .sum::<f64>()
                    / nf
            })
            .sum::<f64>()
            / m
    };

    let gamma0 = autocov(0);
    let within = gamma0 * nf / (nf - 1.0);
    if within <= 0.0 {
        return m * nf;
    }
    let between = if chains.len() > 1 {
        let grand = mean(&means);
        nf * means.iter().map(|mu| (mu - grand).powi(2)).sum::<f64>() / (m - 1.0)
    } else {
        0.0
    };
    let var_plus = (nf - 1.0) / nf * within + between / nf;
    let rho = |lag: usize| 1.0 - (within - autocov(lag)) / var_plus;

    // Geyer initial positive sequence over pairs (ρ_2k + ρ_2k+1)
    let mut tau = -1.0;
    let mut lag = 0;
    while lag + 1 < n {
        let pair = rho(lag) + rho(lag + 1);
        if pair <= 0.0 {
            break;
        }
        tau += 2.0 * pair;
        lag += 2;
    }

    let total = m * nf;
    total / tau.max(1.0 / total.log10())
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
