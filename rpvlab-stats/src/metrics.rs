//! Group Metrics
//!
//! Derives revenue-per-visit (RPV) and its standard error from the raw totals
//! of one experiment group.
//!
//! - RPV = revenue / sessions, unless a manual RPV override is supplied
//! - Standard error = RPV / sqrt(sessions)
//!
//! The input minimums (`sessions >= 1`, `revenue >= 0.01`, override `>= 0.01`)
//! are the only validation performed. They keep the division and the
//! Normal scale parameter well-defined.

use thiserror::Error;

/// Minimum number of sessions per group
pub const MIN_SESSIONS: u64 = 1;

/// Minimum total revenue per group
pub const MIN_REVENUE: f64 = 0.01;

/// Minimum manual RPV override
pub const MIN_RPV: f64 = 0.01;

/// Raw totals for one group, as entered by the user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupInput {
    /// Number of sessions (visits)
    pub sessions: u64,
    /// Total revenue over all sessions
    pub revenue: f64,
    /// Manual RPV that replaces `revenue / sessions` when set
    pub rpv_override: Option<f64>,
}

impl GroupInput {
    /// Group totals without an RPV override
    pub fn new(sessions: u64, revenue: f64) -> Self {
        Self {
            sessions,
            revenue,
            rpv_override: None,
        }
    }

    /// Replace the derived RPV with a manual value
    pub fn with_rpv(mut self, rpv: f64) -> Self {
        self.rpv_override = Some(rpv);
        self
    }
}

/// Derived metrics for one group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupMetrics {
    /// Number of sessions
    pub sessions: u64,
    /// Total revenue
    pub revenue: f64,
    /// Revenue per visit (derived or overridden)
    pub rpv: f64,
    /// Standard error of the RPV estimate: `rpv / sqrt(sessions)`
    pub standard_error: f64,
    /// Whether `rpv` came from a manual override
    pub rpv_overridden: bool,
}

impl GroupMetrics {
    /// Derive metrics from raw group totals
    pub fn from_input(input: &GroupInput) -> Result<Self, MetricsError> {
        derive_metrics(input)
    }

    /// RPV computed from the totals, ignoring any override
    pub fn observed_rpv(&self) -> f64 {
        self.revenue / self.sessions as f64
    }
}

/// Errors from metric derivation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    #[error("sessions must be at least {MIN_SESSIONS}, got {0}")]
    TooFewSessions(u64),

    #[error("revenue must be a finite value of at least {MIN_REVENUE}, got {0}")]
    InvalidRevenue(f64),

    #[error("RPV override must be a finite value of at least {MIN_RPV}, got {0}")]
    InvalidRpv(f64),
}

/// Derive RPV and standard error for a group
pub fn derive_metrics(input: &GroupInput) -> Result<GroupMetrics, MetricsError> {
    if input.sessions < MIN_SESSIONS {
        return Err(MetricsError::TooFewSessions(input.sessions));
    }
    if !input.revenue.is_finite() || input.revenue < MIN_REVENUE {
        return Err(MetricsError::InvalidRevenue(input.revenue));
    }

    let (rpv, rpv_overridden) = match input.rpv_override {
        Some(rpv) if !rpv.is_finite() || rpv < MIN_RPV => {
            return Err(MetricsError::InvalidRpv(rpv));
        }
        Some(rpv) => (rpv, true),
        None => (input.revenue / input.sessions as f64, false),
    };

    Ok(GroupMetrics {
        sessions: input.sessions,
        revenue: input.revenue,
        rpv,
        standard_error: standard_error(rpv, input.sessions),
        rpv_overridden,
    })
}

/// Standard error of an RPV estimate over `sessions` visits
pub fn standard_error(rpv: f64, sessions: u64) -> f64 {
    rpv / (sessions as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpv_is_revenue_over_sessions() {
        let metrics = derive_metrics(&GroupInput::new(14403, 803801.41)).unwrap();

        assert!((metrics.rpv - 803801.41 / 14403.0).abs() < 1e-9);
        assert!(!metrics.rpv_overridden);
        assert!((metrics.standard_error - metrics.rpv / 14403f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_override_replaces_rpv() {
        let metrics = derive_metrics(&GroupInput::new(100, 500.0).with_rpv(7.5)).unwrap();

        assert_eq!(metrics.rpv, 7.5);
        assert!(metrics.rpv_overridden);
        assert!((metrics.standard_error - 0.75).abs() < 1e-12);
        // Observed RPV still reflects the totals
        assert!((metrics.observed_rpv() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_standard_error_decreases_with_sessions() {
        let mut previous = f64::INFINITY;
        for sessions in [1, 2, 10, 100, 10_000, 1_000_000] {
            let se = standard_error(55.8, sessions);
            assert!(se > 0.0);
            assert!(se < previous);
            previous = se;
        }
    }

    #[test]
    fn test_single_session_is_valid() {
        let metrics = derive_metrics(&GroupInput::new(1, 0.01)).unwrap();
        assert!((metrics.rpv - 0.01).abs() < f64::EPSILON);
        assert!((metrics.standard_error - 0.01).abs() < f64::EPSILON);
    }

    #[test]
    fn test_minimums_rejected() {
        assert_eq!(
            derive_metrics(&GroupInput::new(0, 10.0)),
            Err(MetricsError::TooFewSessions(0))
        );
        assert!(matches!(
            derive_metrics(&GroupInput::new(10, 0.0)),
            Err(MetricsError::InvalidRevenue(_))
        ));
        assert!(matches!(
            derive_metrics(&GroupInput::new(10, f64::NAN)),
            Err(MetricsError::InvalidRevenue(_))
        ));
        assert!(matches!(
            derive_metrics(&GroupInput::new(10, 10.0).with_rpv(0.001)),
            Err(MetricsError::InvalidRpv(_))
        ));
    }
}
