//! MCMC Posterior Sampler
//!
//! Samples the two-parameter RPV model with component-wise random-walk
//! Metropolis:
//!
//! ```text
//! mu_control   ~ N(rpv_control,   se_control)
//! mu_variation ~ N(rpv_variation, se_variation)
//! diff         = mu_variation - mu_control      (deterministic)
//! ```
//!
//! Each chain starts at the prior means, runs a tuning phase that adapts one
//! proposal scale per parameter toward the target acceptance rate, then keeps
//! `draws` samples. Tuning draws are discarded.
//!
//! Chains run in parallel on the Rayon pool. Each chain owns an independent
//! stream of the seeded generator (advanced with `jump()`), and chains are
//! collected in index order, so the trace is identical for a given seed
//! regardless of thread count.

use crate::error::SamplerError;
use crate::metrics::GroupMetrics;
use crate::{DEFAULT_CHAINS, DEFAULT_DRAWS, DEFAULT_SEED, DEFAULT_TARGET_ACCEPTANCE, DEFAULT_TUNE};
use rand::prelude::*;
use rand_distr::StandardNormal;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

/// Number of steps between adaptation updates during tuning
const TUNE_INTERVAL: usize = 50;

/// Number of steps between progress notifications
const PROGRESS_STRIDE: usize = 250;

/// Parameter names, in model order
pub const PARAMETER_NAMES: [&str; 2] = ["mu_control", "mu_variation"];

/// MCMC configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct McmcConfig {
    /// Retained draws per chain (default: 10,000)
    pub draws: usize,
    /// Tuning steps per chain, discarded (default: 1,000)
    pub tune: usize,
    /// Number of independent chains (default: 2)
    pub chains: usize,
    /// Base seed; chain `i` uses the i-th jump of this stream (default: 42)
    pub seed: u64,
    /// Acceptance rate targeted by step-size adaptation (default: 0.44)
    pub target_acceptance: f64,
}

impl Default for McmcConfig {
    fn default() -> Self {
        Self {
            draws: DEFAULT_DRAWS,
            tune: DEFAULT_TUNE,
            chains: DEFAULT_CHAINS,
            seed: DEFAULT_SEED,
            target_acceptance: DEFAULT_TARGET_ACCEPTANCE,
        }
    }
}

impl McmcConfig {
    /// Total steps across all chains, including tuning
    pub fn total_steps(&self) -> u64 {
        ((self.draws + self.tune) * self.chains) as u64
    }
}

/// Receives progress updates from running chains
///
/// Called concurrently from every chain, so implementations must be `Sync`.
pub trait ChainProgress: Sync {
    /// `steps` more steps completed in some chain
    fn advance(&self, steps: u64);
}

impl ChainProgress for () {
    fn advance(&self, _steps: u64) {}
}

/// Normal prior on one latent mean
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalPrior {
    /// Prior mean
    pub mu: f64,
    /// Prior standard deviation
    pub sigma: f64,
}

impl NormalPrior {
    /// Log density up to an additive constant
    pub fn log_density(&self, x: f64) -> f64 {
        let z = (x - self.mu) / self.sigma;
        -0.5 * z * z
    }
}

/// The two-parameter RPV model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RpvModel {
    /// Prior on the control mean
    pub control: NormalPrior,
    /// Prior on the variation mean
    pub variation: NormalPrior,
}

impl RpvModel {
    /// Center each prior on the group's RPV with its standard error as width
    pub fn from_metrics(control: &GroupMetrics, variation: &GroupMetrics) -> Self {
        Self {
            control: NormalPrior {
                mu: control.rpv,
                sigma: control.standard_error,
            },
            variation: NormalPrior {
                mu: variation.rpv,
                sigma: variation.standard_error,
            },
        }
    }

    fn priors(&self) -> [NormalPrior; 2] {
        [self.control, self.variation]
    }

    fn validate(&self) -> Result<(), SamplerError> {
        for prior in self.priors() {
            if !prior.mu.is_finite() || !prior.sigma.is_finite() || prior.sigma <= 0.0 {
                return Err(SamplerError::InvalidNormal {
                    mean: prior.mu,
                    sd: prior.sigma,
                });
            }
        }
        Ok(())
    }
}

/// Retained draws of a single chain
#[derive(Debug, Clone)]
pub struct ChainTrace {
    /// Draws of `mu_control`
    pub mu_control: Vec<f64>,
    /// Draws of `mu_variation`
    pub mu_variation: Vec<f64>,
    /// Acceptance rate per parameter over the retained draws
    pub acceptance_rate: [f64; 2],
    /// Proposal scale per parameter after tuning
    pub step_size: [f64; 2],
}

impl ChainTrace {
    /// Draws of `parameter` (index into [`PARAMETER_NAMES`])
    pub fn parameter(&self, parameter: usize) -> &[f64] {
        match parameter {
            0 => &self.mu_control,
            _ => &self.mu_variation,
        }
    }
}

/// Posterior trace over all chains
#[derive(Debug, Clone)]
pub struct PosteriorTrace {
    /// Per-chain draws, in chain order
    pub chains: Vec<ChainTrace>,
    /// Tuning steps that preceded the retained draws
    pub tune: usize,
}

impl PosteriorTrace {
    /// Retained draws per chain
    pub fn draws_per_chain(&self) -> usize {
        self.chains.first().map(|c| c.mu_control.len()).unwrap_or(0)
    }

    /// Retained draws across all chains
    pub fn total_draws(&self) -> usize {
        self.chains.iter().map(|c| c.mu_control.len()).sum()
    }

    /// `mu_control` draws, chains concatenated
    pub fn mu_control(&self) -> Vec<f64> {
        self.chains
            .iter()
            .flat_map(|c| c.mu_control.iter().copied())
            .collect()
    }

    /// `mu_variation` draws, chains concatenated
    pub fn mu_variation(&self) -> Vec<f64> {
        self.chains
            .iter()
            .flat_map(|c| c.mu_variation.iter().copied())
            .collect()
    }

    /// Deterministic `diff = mu_variation - mu_control`, chains concatenated
    pub fn diff(&self) -> Vec<f64> {
        self.chains
            .iter()
            .flat_map(|c| c.mu_variation.iter().zip(&c.mu_control).map(|(v, c)| v - c))
            .collect()
    }

    /// Fraction of draws with `diff > 0`
    pub fn probability_variation_better(&self) -> f64 {
        let total = self.total_draws();
        if total == 0 {
            return 0.0;
        }
        let positive = self
            .chains
            .iter()
            .flat_map(|c| c.mu_variation.iter().zip(&c.mu_control))
            .filter(|&(v, c)| v - c > 0.0)
            .count();
        positive as f64 / total as f64
    }
}

/// Sample the posterior of `model`
pub fn sample_posterior(
    model: &RpvModel,
    config: &McmcConfig,
    progress: &dyn ChainProgress,
) -> Result<PosteriorTrace, SamplerError> {
    if config.draws == 0 {
        return Err(SamplerError::NoSamples);
    }
    if config.chains == 0 {
        return Err(SamplerError::NoChains);
    }
    if !(config.target_acceptance > 0.0 && config.target_acceptance < 1.0) {
        return Err(SamplerError::InvalidAcceptance(config.target_acceptance));
    }
    model.validate()?;

    // One independent stream per chain
    let mut base = Xoshiro256PlusPlus::seed_from_u64(config.seed);
    let mut streams = Vec::with_capacity(config.chains);
    for _ in 0..config.chains {
        streams.push(base.clone());
        base.jump();
    }

    let chains: Vec<ChainTrace> = streams
        .into_par_iter()
        .map(|rng| run_chain(model, config, rng, progress))
        .collect();

    Ok(PosteriorTrace {
        chains,
        tune: config.tune,
    })
}

fn run_chain(
    model: &RpvModel,
    config: &McmcConfig,
    mut rng: Xoshiro256PlusPlus,
    progress: &dyn ChainProgress,
) -> ChainTrace {
    let priors = model.priors();
    let mut position = [priors[0].mu, priors[1].mu];
    let mut log_scale = [priors[0].sigma.ln(), priors[1].sigma.ln()];

    // Tuning: adapt the proposal scale in windows, with shrinking adjustments
    let mut window_accepted = [0usize; 2];
    let mut window = 0usize;
    for step in 0..config.tune {
        for p in 0..2 {
            if metropolis_step(&priors[p], &mut position[p], log_scale[p].exp(), &mut rng) {
                window_accepted[p] += 1;
            }
        }

        if (step + 1) % TUNE_INTERVAL == 0 {
            window += 1;
            let gain = 1.0 / (window as f64).sqrt();
            for p in 0..2 {
                let rate = window_accepted[p] as f64 / TUNE_INTERVAL as f64;
                log_scale[p] += gain * (rate - config.target_acceptance) * 2.0;
                window_accepted[p] = 0;
            }
        }

        if (step + 1) % PROGRESS_STRIDE == 0 {
            progress.advance(PROGRESS_STRIDE as u64);
        }
    }
    progress.advance((config.tune % PROGRESS_STRIDE) as u64);

    let step_size = [log_scale[0].exp(), log_scale[1].exp()];
    let mut accepted = [0usize; 2];
    let mut draws = [
        Vec::with_capacity(config.draws),
        Vec::with_capacity(config.draws),
    ];

    for step in 0..config.draws {
        for p in 0..2 {
            if metropolis_step(&priors[p], &mut position[p], step_size[p], &mut rng) {
                accepted[p] += 1;
            }
            draws[p].push(position[p]);
        }

        if (step + 1) % PROGRESS_STRIDE == 0 {
            progress.advance(PROGRESS_STRIDE as u64);
        }
    }
    progress.advance((config.draws % PROGRESS_STRIDE) as u64);

    let [mu_control, mu_variation] = draws;
    ChainTrace {
        mu_control,
        mu_variation,
        acceptance_rate: [
            accepted[0] as f64 / config.draws as f64,
            accepted[1] as f64 / config.draws as f64,
        ],
        step_size,
    }
}

/// One Gaussian random-walk Metropolis update; returns whether it was accepted
fn metropolis_step<R: Rng>(prior: &NormalPrior, x: &mut f64, scale: f64, rng: &mut R) -> bool {
    let z: f64 = rng.sample(StandardNormal);
    let proposal = *x + scale * z;
    let log_ratio = prior.log_density(proposal) - prior.log_density(*x);

    let u: f64 = rng.gen_range(0.0..1.0);
    if log_ratio >= 0.0 || u.ln() < log_ratio {
        *x = proposal;
        true
    } else {
        false
    }
}
