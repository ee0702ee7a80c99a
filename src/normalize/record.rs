//! Record normalization: one canonical shape out of many source shapes.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::amount::extract_amount;
use super::scale::{Divisor, compute_divisor};
use crate::models::{CanonicalTransaction, RawRecord};
use crate::timestamp::to_iso;

/// Keys that may carry the record identifier, highest priority first.
const ID_KEYS: [&str; 2] = ["transaction_id", "id"];

/// Keys that may carry the record time, highest priority first.
const TIME_KEYS: [&str; 2] = ["timestamp", "time"];

/// Keys that may carry the risk score, highest priority first.
const RISK_KEYS: [&str; 2] = ["risk_score", "risk_level"];

/// Normalizes one record using the current time as the timestamp
/// fallback.
///
/// `position` is the record's index in its batch and only feeds the
/// fallback identifier.
#[inline]
#[must_use]
pub fn normalize(raw: &RawRecord, divisor: Divisor, position: usize) -> CanonicalTransaction {
    normalize_at(raw, divisor, position, Utc::now())
}

/// Normalizes one record with an explicit timestamp fallback.
///
/// Never fails: a missing or malformed field degrades to its default.
#[must_use]
pub fn normalize_at(
    raw: &RawRecord,
    divisor: Divisor,
    position: usize,
    now: DateTime<Utc>,
) -> CanonicalTransaction {
    let id = raw
        .first_present(&ID_KEYS)
        .and_then(scalar_text)
        .unwrap_or_else(|| format!("transaction-{position}"));
    let timestamp = raw
        .first_present(&TIME_KEYS)
        .and_then(scalar_text)
        .unwrap_or_else(|| to_iso(now));
    let amount = extract_amount(raw).map_or(0.0, |extracted| divisor.apply(extracted).abs());
    let risk_score = raw.first_present(&RISK_KEYS).map_or(0.0, coerce_number);
    let confidence = raw.present("confidence").map_or(0.0, coerce_number);

    let mut extra = raw.as_map().clone();
    for key in CanonicalTransaction::CANONICAL_KEYS {
        let _owned = extra.remove(key);
    }

    CanonicalTransaction {
        id,
        timestamp,
        amount,
        risk_score,
        confidence,
        extra,
    }
}

/// Normalizes a whole batch.
///
/// The divisor is decided once from every extractable amount and applied
/// to all records alike.
#[must_use]
pub fn normalize_batch(records: &[RawRecord]) -> Vec<CanonicalTransaction> {
    let now = Utc::now();
    let candidates: Vec<f64> = records.iter().filter_map(extract_amount).collect();
    let divisor = compute_divisor(&candidates);
    tracing::debug!(
        records = records.len(),
        with_amount = candidates.len(),
        ?divisor,
        "normalizing batch"
    );
    records
        .iter()
        .enumerate()
        .map(|(position, raw)| normalize_at(raw, divisor, position, now))
        .collect()
}

/// Renders a scalar as text. Objects and arrays yield `None`.
fn scalar_text(value: &Value) -> Option<String> {
    if let Some(text) = value.as_str() {
        return Some(text.to_owned());
    }
    (value.is_number() || value.is_boolean()).then(|| value.to_string())
}

/// Lenient number coercion; anything non-finite becomes 0.
///
/// Strings are trimmed and an empty string counts as 0. Booleans count as
/// 1 and 0.
fn coerce_number(value: &Value) -> f64 {
    let number = if let Some(text) = value.as_str() {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            0.0
        } else {
            trimmed.parse().unwrap_or(f64::NAN)
        }
    } else if let Some(flag) = value.as_bool() {
        f64::from(u8::from(flag))
    } else {
        value.as_f64().unwrap_or(f64::NAN)
    };
    if number.is_finite() { number } else { 0.0 }
}
