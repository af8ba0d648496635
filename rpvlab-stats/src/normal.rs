//! Normal-Approximation Sampler
//!
//! Draws independent samples from `Normal(rpv, standard_error)` for each group
//! and compares them elementwise. The comparison is between independent draws,
//! not a paired comparison of a joint posterior.
//!
//! All draws come from a single seeded generator (control first, then
//! variation), so identical inputs and seed reproduce identical samples.

use crate::error::SamplerError;
use crate::metrics::GroupMetrics;
use crate::{DEFAULT_NORMAL_SAMPLES, DEFAULT_SEED};
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Normal sampler configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalConfig {
    /// Samples drawn per group (default: 100,000)
    pub samples: usize,
    /// Generator seed (default: 42)
    pub seed: u64,
}

impl Default for NormalConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_NORMAL_SAMPLES,
            seed: DEFAULT_SEED,
        }
    }
}

/// Independent samples for both groups
#[derive(Debug, Clone)]
pub struct NormalSamples {
    /// Draws from `Normal(rpv_control, se_control)`
    pub control: Vec<f64>,
    /// Draws from `Normal(rpv_variation, se_variation)`
    pub variation: Vec<f64>,
}

impl NormalSamples {
    /// Elementwise `variation - control`
    pub fn differences(&self) -> Vec<f64> {
        self.variation
            .iter()
            .zip(&self.control)
            .map(|(v, c)| v - c)
            .collect()
    }

    /// Fraction of index pairs where the variation draw exceeds the control draw
    pub fn probability_variation_better(&self) -> f64 {
        probability_greater(&self.variation, &self.control)
    }
}

/// Draw Normal-approximation samples for both groups
pub fn sample_normal(
    control: &GroupMetrics,
    variation: &GroupMetrics,
    config: &NormalConfig,
) -> Result<NormalSamples, SamplerError> {
    if config.samples == 0 {
        return Err(SamplerError::NoSamples);
    }

    let control_dist = normal_for(control)?;
    let variation_dist = normal_for(variation)?;

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
    let control = control_dist
        .sample_iter(&mut rng)
        .take(config.samples)
        .collect();
    let variation = variation_dist
        .sample_iter(&mut rng)
        .take(config.samples)
        .collect();

    Ok(NormalSamples { control, variation })
}

fn normal_for(metrics: &GroupMetrics) -> Result<Normal<f64>, SamplerError> {
    Normal::new(metrics.rpv, metrics.standard_error).map_err(|_| SamplerError::InvalidNormal {
        mean: metrics.rpv,
        sd: metrics.standard_error,
    })
}

/// Fraction of positions where `a[i] > b[i]`
///
/// Compares up to the shorter of the two slices; returns 0.0 when either is empty.
pub fn probability_greater(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let wins = a.iter().zip(b).filter(|&(x, y)| x > y).count();
    wins as f64 / n as f64
}

/// Closed-form `P(variation > control)` for the two Normal approximations
///
/// `Φ((rpv_v - rpv_c) / sqrt(se_v² + se_c²))`. The empirical probability from
/// [`sample_normal`] converges to this value as the sample count grows.
pub fn analytic_probability(control: &GroupMetrics, variation: &GroupMetrics) -> f64 {
    let mean = variation.rpv - control.rpv;
    let sd = (variation.standard_error.powi(2) + control.standard_error.powi(2)).sqrt();
    if sd == 0.0 {
        return if mean > 0.0 { 1.0 } else { 0.0 };
    }
    normal_cdf(mean / sd)
}

/// Standard normal CDF
fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

/// Error function approximation
fn erf(x: f64) -> f64 {
    // Abramowitz and Stegun approximation (7.1.26)
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x >= 0.0 { 1.0 } else { -1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();

    sign * y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{GroupInput, derive_metrics};

    fn default_groups() -> (GroupMetrics, GroupMetrics) {
        (
            derive_metrics(&GroupInput::new(14403, 803801.41)).unwrap(),
            derive_metrics(&GroupInput::new(13913, 838703.13)).unwrap(),
        )
    }

    #[test]
    fn test_same_seed_reproduces_probability() {
        let (control, variation) = default_groups();
        let config = NormalConfig::default();

        let first = sample_normal(&control, &variation, &config).unwrap();
        let second = sample_normal(&control, &variation, &config).unwrap();

        assert_eq!(first.control, second.control);
        assert_eq!(first.variation, second.variation);
        assert_eq!(
            first.probability_variation_better(),
            second.probability_variation_better()
        );
    }

    #[test]
    fn test_different_seed_changes_draws() {
        let (control, variation) = default_groups();
        let a = sample_normal(&control, &variation, &NormalConfig { samples: 100, seed: 1 }).unwrap();
        let b = sample_normal(&control, &variation, &NormalConfig { samples: 100, seed: 2 }).unwrap();
        assert_ne!(a.control, b.control);
    }

    #[test]
    fn test_sample_moments_match_parameters() {
        let (control, variation) = default_groups();
        let samples = sample_normal(&control, &variation, &NormalConfig::default()).unwrap();

        assert_eq!(samples.control.len(), DEFAULT_NORMAL_SAMPLES);
        assert_eq!(samples.variation.len(), DEFAULT_NORMAL_SAMPLES);

        let mean = samples.control.iter().sum::<f64>() / samples.control.len() as f64;
        assert!((mean - control.rpv).abs() < 0.05 * control.standard_error);

        let var = samples
            .control
            .iter()
            .map(|x| (x - mean).powi(2))
            .sum::<f64>()
            / (samples.control.len() - 1) as f64;
        assert!((var.sqrt() / control.standard_error - 1.0).abs() < 0.02);
    }

    #[test]
    fn test_empirical_matches_analytic() {
        let (control, variation) = default_groups();
        let samples = sample_normal(&control, &variation, &NormalConfig::default()).unwrap();

        let empirical = samples.probability_variation_better();
        let analytic = analytic_probability(&control, &variation);
        assert!((0.0..=1.0).contains(&empirical));
        assert!((empirical - analytic).abs() < 0.01);
    }

    #[test]
    fn test_swapping_groups_complements_analytic() {
        let (control, variation) = default_groups();
        let forward = analytic_probability(&control, &variation);
        let backward = analytic_probability(&variation, &control);
        assert!((forward + backward - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_samples_rejected() {
        let (control, variation) = default_groups();
        let config = NormalConfig { samples: 0, seed: 42 };
        assert_eq!(
            sample_normal(&control, &variation, &config).unwrap_err(),
            SamplerError::NoSamples
        );
    }

    #[test]
    fn test_probability_greater() {
        assert_eq!(probability_greater(&[2.0, 0.0, 3.0, 1.0], &[1.0, 1.0, 1.0, 1.0]), 0.5);
        assert_eq!(probability_greater(&[], &[1.0]), 0.0);
    }

    #[test]
    fn test_normal_cdf() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 0.01);
        assert!((normal_cdf(1.96) - 0.975).abs() < 0.01);
        assert!((normal_cdf(-1.96) - 0.025).abs() < 0.01);
    }
}
