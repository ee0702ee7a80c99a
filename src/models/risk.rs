//! Risk level buckets.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FraudShieldError;

/// Coarse risk bucket the scoring backend attaches to a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Score below 25.
    Low,
    /// Score in `[25, 50)`.
    Medium,
    /// Score in `[50, 75)`.
    High,
    /// Score of 75 or more.
    Critical,
}

impl RiskLevel {
    /// All levels, lowest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Buckets a 0..=100 risk score.
    #[inline]
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 25.0 {
            Self::Low
        } else if score < 50.0 {
            Self::Medium
        } else if score < 75.0 {
            Self::High
        } else {
            Self::Critical
        }
    }

    /// Buckets a raw fraud probability the way the scoring backend does.
    #[inline]
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability < 0.2 {
            Self::Low
        } else if probability < 0.4 {
            Self::Medium
        } else if probability < 0.6 {
            Self::High
        } else {
            Self::Critical
        }
    }

    /// Wire representation (`"LOW"`, `"MEDIUM"`, ...).
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskLevel {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = FraudShieldError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| FraudShieldError::InvalidInput(format!("unknown risk level `{s}`")))
    }
}
