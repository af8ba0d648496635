//! Sampler errors shared by the Normal and MCMC paths

use thiserror::Error;

/// Errors from drawing samples
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplerError {
    #[error("sample count must be positive")]
    NoSamples,

    #[error("invalid Normal parameters: mean {mean}, sd {sd}")]
    InvalidNormal { mean: f64, sd: f64 },

    #[error("target acceptance rate must be in (0, 1), got {0}")]
    InvalidAcceptance(f64),

    #[error("chain count must be positive")]
    NoChains,
}
