//! Dashboard analytics models: history statistics, trends, model metrics.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::RiskLevel;

/// Per-level prediction counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskCounts {
    /// Predictions bucketed as low risk.
    #[serde(rename = "LOW")]
    pub low: u64,
    /// Predictions bucketed as medium risk.
    #[serde(rename = "MEDIUM")]
    pub medium: u64,
    /// Predictions bucketed as high risk.
    #[serde(rename = "HIGH")]
    pub high: u64,
    /// Predictions bucketed as critical risk.
    #[serde(rename = "CRITICAL")]
    pub critical: u64,
}

impl RiskCounts {
    /// Count for one level.
    #[inline]
    #[must_use]
    pub const fn get(&self, level: RiskLevel) -> u64 {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Medium => self.medium,
            RiskLevel::High => self.high,
            RiskLevel::Critical => self.critical,
        }
    }

    /// Expands the counts into one share per level, as a percentage of
    /// `total`. A zero total yields zero percentages.
    #[must_use]
    pub fn shares(&self, total: u64) -> Vec<RiskShare> {
        RiskLevel::ALL
            .into_iter()
            .map(|risk_level| {
                let count = self.get(risk_level);
                let percentage = if total > 0 {
                    count as f64 / total as f64 * 100.0
                } else {
                    0.0
                };
                RiskShare {
                    risk_level,
                    count,
                    percentage,
                }
            })
            .collect()
    }
}

/// Response of `GET /predict/history/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryStats {
    /// Number of stored predictions.
    pub total_predictions: u64,
    /// Number of predictions flagged as fraud.
    pub total_fraud_detected: u64,
    /// Fraud share of all predictions, in `[0, 1]`.
    pub fraud_rate: f64,
    /// Mean risk score.
    pub average_risk_score: f64,
    /// Counts per risk level.
    pub risk_distribution: RiskCounts,
}

impl HistoryStats {
    /// Risk distribution as shares of `total_predictions`.
    #[inline]
    #[must_use]
    pub fn risk_shares(&self) -> Vec<RiskShare> {
        self.risk_distribution.shares(self.total_predictions)
    }
}

/// Headline numbers of the overview page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    /// Transactions scored so far.
    pub total_transactions: u64,
    /// Transactions flagged as fraud.
    pub fraud_detected: u64,
    /// Fraud share of all predictions, in `[0, 1]`.
    pub fraud_rate: f64,
    /// Total amount scored; the history backend does not track it.
    pub total_amount_processed: f64,
    /// Amount of blocked fraud; the history backend does not track it.
    pub fraud_amount_blocked: f64,
    /// When the summary was assembled.
    pub last_updated: String,
}

impl AnalyticsSummary {
    /// Derives a summary from history statistics.
    #[inline]
    #[must_use]
    pub fn from_stats(stats: &HistoryStats, now: DateTime<Utc>) -> Self {
        Self {
            total_transactions: stats.total_predictions,
            fraud_detected: stats.total_fraud_detected,
            fraud_rate: stats.fraud_rate,
            total_amount_processed: 0.0,
            fraud_amount_blocked: 0.0,
            last_updated: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Share of predictions in one risk bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskShare {
    /// Bucket.
    pub risk_level: RiskLevel,
    /// Predictions in the bucket.
    pub count: u64,
    /// Percentage of all predictions.
    pub percentage: f64,
}

/// One point of the hourly fraud trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Start of the bucket.
    pub timestamp: String,
    /// Transactions in the bucket.
    #[serde(default)]
    pub total_transactions: u64,
    /// Fraud detections in the bucket.
    #[serde(default)]
    pub fraud_detected: u64,
    /// Fraud rate in percent.
    #[serde(default)]
    pub fraud_rate: f64,
}

/// Trend payload, accepted both bare and wrapped in `{ "data": [...] }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum TrendsPayload {
    /// A bare list.
    List(Vec<TrendPoint>),
    /// A list under `data`.
    Wrapped {
        /// The points.
        data: Vec<TrendPoint>,
    },
}

impl TrendsPayload {
    /// Unwraps the points regardless of shape.
    #[inline]
    pub(crate) fn into_points(self) -> Vec<TrendPoint> {
        match self {
            Self::List(points) | Self::Wrapped { data: points } => points,
        }
    }
}

/// Response of `GET /model/info`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    /// Share of correct predictions.
    pub accuracy: f64,
    /// Share of fraud flags that were fraud.
    pub precision: f64,
    /// Share of fraud that was flagged.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1_score: f64,
}
