//! Result Interpretation
//!
//! Maps `P(variation > control)` to a qualitative verdict. All comparisons are
//! strict: a probability of exactly 0.95 is a [`Verdict::GoodChance`], not a
//! [`Verdict::HighChance`].

use serde::{Deserialize, Serialize};

/// Probability above which the variation is very likely better
pub const HIGH_CHANCE_THRESHOLD: f64 = 0.95;

/// Probability above which the variation is likely better
pub const GOOD_CHANCE_THRESHOLD: f64 = 0.75;

/// Probability above which the result is inconclusive rather than a loss
pub const INCONCLUSIVE_THRESHOLD: f64 = 0.55;

/// Qualitative reading of the probability of improvement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// p > 0.95
    HighChance,
    /// 0.75 < p <= 0.95
    GoodChance,
    /// 0.55 < p <= 0.75
    Inconclusive,
    /// p <= 0.55
    ControlBest,
}

impl Verdict {
    /// Bucket a probability
    pub fn from_probability(probability: f64) -> Self {
        if probability > HIGH_CHANCE_THRESHOLD {
            Verdict::HighChance
        } else if probability > GOOD_CHANCE_THRESHOLD {
            Verdict::GoodChance
        } else if probability > INCONCLUSIVE_THRESHOLD {
            Verdict::Inconclusive
        } else {
            Verdict::ControlBest
        }
    }

    /// Short label
    pub fn headline(self) -> &'static str {
        match self {
            Verdict::HighChance => "high chance, consider shipping",
            Verdict::GoodChance => "good chance, consider more testing",
            Verdict::Inconclusive => "inconclusive",
            Verdict::ControlBest => "control remains best",
        }
    }

    /// Full sentence shown to the user
    pub fn explanation(self) -> &'static str {
        match self {
            Verdict::HighChance => {
                "The variation has a high chance of beating the control. You can consider shipping it."
            }
            Verdict::GoodChance => {
                "The variation has a good chance of beating the control, but it may be worth testing longer."
            }
            Verdict::Inconclusive => {
                "The results are inconclusive. There is not enough evidence to make a decision."
            }
            Verdict::ControlBest => {
                "The control is still the best option. The variation showed no meaningful improvement."
            }
        }
    }

    /// Status icon for terminal output
    pub fn icon(self) -> &'static str {
        match self {
            Verdict::HighChance => "🎉",
            Verdict::GoodChance => "✅",
            Verdict::Inconclusive => "⚖️",
            Verdict::ControlBest => "❌",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.headline())
    }
}
