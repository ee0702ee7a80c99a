//! Offline stand-in data for when the scoring backend is unreachable.
//!
//! Everything random is drawn from a seeded generator, so a given seed
//! always produces the same dataset.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use crate::models::{
    AnalyticsSummary, Factor, HistoryQuery, ModelInfo, PredictionRequest, PredictionResponse,
    RawRecord, RiskLevel, RiskShare, TransactionId, TransactionPage, TrendPoint,
};
use crate::timestamp::to_iso;

/// Number of generated transactions.
const TRANSACTION_COUNT: u32 = 50;

/// Number of hourly trend points.
const TREND_HOURS: i64 = 24;

/// Share of generated transactions flagged as fraud.
const FRAUD_SHARE: f64 = 0.05;

/// Length of the random part of a mock prediction id.
const PREDICTION_ID_LEN: usize = 9;

/// Fixed risk distribution shown when statistics are unavailable.
const RISK_DISTRIBUTION: [(RiskLevel, u64, f64); 4] = [
    (RiskLevel::Low, 14_234, 93.4),
    (RiskLevel::Medium, 678, 4.5),
    (RiskLevel::High, 234, 1.5),
    (RiskLevel::Critical, 88, 0.6),
];

/// A generated offline dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct MockData {
    /// Generated history, newest id last.
    transactions: Vec<RawRecord>,
    /// Hourly trend, oldest first.
    trends: Vec<TrendPoint>,
    /// Generation time.
    generated_at: DateTime<Utc>,
}

impl MockData {
    /// Generates a dataset anchored at the current time.
    #[inline]
    #[must_use]
    pub fn generate(seed: u64) -> Self {
        Self::generate_at(seed, Utc::now())
    }

    /// Generates a dataset anchored at `now`.
    #[must_use]
    pub fn generate_at(seed: u64, now: DateTime<Utc>) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let transactions = (1..=TRANSACTION_COUNT)
            .map(|number| mock_transaction(number, now, &mut rng))
            .collect();
        let trends = (0..TREND_HOURS)
            .map(|hour| TrendPoint {
                timestamp: to_iso(now - Duration::hours(TREND_HOURS - 1 - hour)),
                total_transactions: rng.random_range(300..800),
                fraud_detected: rng.random_range(1..11),
                fraud_rate: rng.random_range(0.3..2.3),
            })
            .collect();
        tracing::debug!(seed, "generated mock dataset");
        Self {
            transactions,
            trends,
            generated_at: now,
        }
    }

    /// All generated transactions.
    #[inline]
    #[must_use]
    pub fn transactions(&self) -> &[RawRecord] {
        &self.transactions
    }

    /// Filters and paginates the generated history like the backend does.
    #[must_use]
    pub fn page(&self, query: &HistoryQuery) -> TransactionPage {
        let matching: Vec<&RawRecord> = self
            .transactions
            .iter()
            .filter(|record| matches_query(record, query))
            .collect();
        let per_page = query.items_per_page.max(1);
        let page = query.page.max(1);
        let start = usize::try_from(u64::from(page - 1) * u64::from(per_page)).unwrap_or(usize::MAX);
        let total = u64::try_from(matching.len()).unwrap_or(u64::MAX);
        let total_pages = u32::try_from(total.div_ceil(u64::from(per_page)))
            .unwrap_or(u32::MAX)
            .max(1);
        TransactionPage {
            transactions: matching
                .into_iter()
                .skip(start)
                .take(usize::try_from(per_page).unwrap_or(usize::MAX))
                .cloned()
                .collect(),
            total,
            page,
            total_pages,
        }
    }

    /// Fixed headline numbers.
    #[inline]
    #[must_use]
    pub fn summary(&self) -> AnalyticsSummary {
        AnalyticsSummary {
            total_transactions: 15_234,
            fraud_detected: 89,
            fraud_rate: 0.0058,
            total_amount_processed: 2_456_789.5,
            fraud_amount_blocked: 45_678.9,
            last_updated: to_iso(self.generated_at),
        }
    }

    /// Generated hourly trend.
    #[inline]
    #[must_use]
    pub fn trends(&self) -> Vec<TrendPoint> {
        self.trends.clone()
    }

    /// Fixed risk distribution.
    #[must_use]
    #[allow(clippy::unused_self, reason = "same shape as the other fallback accessors")]
    pub fn risk_distribution(&self) -> Vec<RiskShare> {
        RISK_DISTRIBUTION
            .into_iter()
            .map(|(risk_level, count, percentage)| RiskShare {
                risk_level,
                count,
                percentage,
            })
            .collect()
    }

    /// Fixed model metrics.
    #[inline]
    #[must_use]
    #[allow(clippy::unused_self, reason = "same shape as the other fallback accessors")]
    pub const fn model_info(&self) -> ModelInfo {
        ModelInfo {
            accuracy: 0.9956,
            precision: 0.8912,
            recall: 0.8534,
            f1_score: 0.872,
        }
    }
}

/// Whether a generated record passes the query filters.
fn matches_query(record: &RawRecord, query: &HistoryQuery) -> bool {
    let level_ok = query.risk_level.is_none_or(|level| {
        record
            .get("risk_level")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|text| text == level.as_str())
    });
    let fraud_ok = query.is_fraud.is_none_or(|flag| {
        record
            .get("is_fraud")
            .and_then(serde_json::Value::as_bool)
            .is_some_and(|value| value == flag)
    });
    level_ok && fraud_ok
}

/// Draws a risk score: 70..=99 for fraud, 0..=29 otherwise.
fn risk_score<R: Rng + ?Sized>(is_fraud: bool, rng: &mut R) -> f64 {
    let score: u32 = if is_fraud {
        rng.random_range(70..100)
    } else {
        rng.random_range(0..30)
    };
    f64::from(score)
}

/// Generates history record number `number`.
fn mock_transaction<R: Rng + ?Sized>(number: u32, now: DateTime<Utc>, rng: &mut R) -> RawRecord {
    let is_fraud = rng.random_bool(FRAUD_SHARE);
    let score = risk_score(is_fraud, rng);
    let fraud_probability = if is_fraud {
        rng.random_range(0.7..1.0)
    } else {
        rng.random_range(0.0..0.3)
    };
    let age_millis: i64 = rng.random_range(0..86_400_000);
    RawRecord::from_value(json!({
        "id": format!("txn_{number:06}"),
        "amount": rng.random_range(10.0..2010.0),
        "time": rng.random_range(0_u32..10_000),
        "is_fraud": is_fraud,
        "fraud_probability": fraud_probability,
        "risk_score": score,
        "risk_level": RiskLevel::from_score(score).as_str(),
        "confidence": rng.random_range(0.8..1.0),
        "timestamp": to_iso(now - Duration::milliseconds(age_millis)),
    }))
}

/// Produces a plausible prediction for `request` without the backend.
///
/// Half of all mock predictions are fraud. The factors echo the request's
/// amount and its `v14`/`v17` components.
#[must_use]
pub fn mock_prediction<R: Rng + ?Sized>(request: &PredictionRequest, rng: &mut R) -> PredictionResponse {
    let is_fraud = rng.random_bool(0.5);
    let score = risk_score(is_fraud, rng);
    let fraud_probability = if is_fraud {
        rng.random_range(0.7..1.0)
    } else {
        rng.random_range(0.0..0.2)
    };
    let suffix: String = (0..PREDICTION_ID_LEN)
        .filter_map(|_| char::from_digit(rng.random_range(0..36), 36))
        .collect();
    let factor = |feature: &str, impact: &str, value: f64| Factor {
        feature: feature.to_owned(),
        impact: impact.to_owned(),
        value,
    };
    PredictionResponse {
        transaction_id: TransactionId::with_suffix(&suffix),
        is_fraud,
        fraud_probability,
        risk_score: score,
        risk_level: RiskLevel::from_score(score),
        confidence: rng.random_range(0.85..1.0),
        factors: vec![
            factor("Amount", "High", request.amount),
            factor("V14", "Medium", request.components.get(14).unwrap_or_default()),
            factor("V17", "Low", request.components.get(17).unwrap_or_default()),
        ],
        timestamp: to_iso(Utc::now()),
    }
}
