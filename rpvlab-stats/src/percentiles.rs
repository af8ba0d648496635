//! Percentiles and Credible Intervals
//!
//! Percentiles use linear interpolation between nearest ranks. Credible
//! intervals are equal-tailed: the `(1 - level) / 2` and `(1 + level) / 2`
//! percentiles of the draws.

/// Equal-tailed credible interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CredibleInterval {
    /// Lower bound
    pub lower: f64,
    /// Upper bound
    pub upper: f64,
    /// Probability mass covered (e.g. 0.95)
    pub level: f64,
}

impl CredibleInterval {
    /// Whether the interval covers `value`
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Whether the interval lies strictly on one side of zero
    pub fn excludes_zero(&self) -> bool {
        self.lower > 0.0 || self.upper < 0.0
    }
}

/// Compute a single percentile from samples
///
/// Uses linear interpolation between nearest ranks.
///
/// # Examples
///
/// ```
/// # use rpvlab_stats::compute_percentile;
/// let samples = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(compute_percentile(&samples, 50.0), 3.0);
/// ```
pub fn compute_percentile(samples: &[f64], percentile: f64) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    percentile_of_sorted(&sorted, percentile)
}

/// Percentile of already-sorted samples
pub fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    if sorted.len() == 1 {
        return sorted[0];
    }

    let n = sorted.len();
    let p = (percentile / 100.0).clamp(0.0, 1.0);

    // Linear interpolation between nearest ranks
    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
}

/// Equal-tailed credible interval of the draws at `level` (e.g. 0.95)
pub fn credible_interval(samples: &[f64], level: f64) -> CredibleInterval {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let tail = (1.0 - level) / 2.0 * 100.0;
    CredibleInterval {
        lower: percentile_of_sorted(&sorted, tail),
        upper: percentile_of_sorted(&sorted, 100.0 - tail),
        level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        let samples = vec![5.0, 1.0, 4.0, 2.0, 3.0];
        let p50 = compute_percentile(&samples, 50.0);
        assert!((p50 - 3.0).abs() < 0.01);
    }

    #[test]
    fn test_quartiles() {
        let samples: Vec<f64> = (1..=100).map(|x| x as f64).collect();
        let p25 = compute_percentile(&samples, 25.0);
        let p75 = compute_percentile(&samples, 75.0);

        assert!((p25 - 25.75).abs() < 1.0);
        assert!((p75 - 75.25).abs() < 1.0);
    }

    #[test]
    fn test_single_sample() {
        let samples = vec![42.0];
        let p50 = compute_percentile(&samples, 50.0);
        assert!((p50 - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_samples() {
        let samples: Vec<f64> = Vec::new();
        let p50 = compute_percentile(&samples, 50.0);
        assert!((p50 - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_credible_interval_bounds() {
        let samples: Vec<f64> = (0..=1000).map(|x| x as f64).collect();
        let ci = credible_interval(&samples, 0.95);

        assert!((ci.lower - 25.0).abs() < 1e-9);
        assert!((ci.upper - 975.0).abs() < 1e-9);
        assert!(ci.contains(500.0));
        assert!(ci.excludes_zero());
    }

    #[test]
    fn test_credible_interval_spanning_zero() {
        let samples: Vec<f64> = (-100..=100).map(|x| x as f64).collect();
        let ci = credible_interval(&samples, 0.9);
        assert!(!ci.excludes_zero());
        assert!(ci.lower < 0.0 && ci.upper > 0.0);
    }
}
