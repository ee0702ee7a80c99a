//! Raw and canonical transaction records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RiskLevel;

/// One transaction as received from the backend.
///
/// The shape is not guaranteed: different endpoints and backend versions
/// spell the amount differently, nest it, or bury it in a factor list.
/// [`crate::normalize`] turns these into [`CanonicalTransaction`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    /// Creates an empty record.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an arbitrary JSON value. Anything but an object becomes an
    /// empty record.
    #[inline]
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
                Self::default()
            }
        }
    }

    /// Returns the value stored under `key`, including explicit nulls.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the value under `key` unless it is missing or null.
    #[inline]
    #[must_use]
    pub fn present(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|value| !value.is_null())
    }

    /// Returns the first non-null value among `keys`.
    #[inline]
    #[must_use]
    pub fn first_present(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter().find_map(|key| self.present(key))
    }

    /// Sets `key`, returning the previous value.
    #[inline]
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Borrows the underlying JSON object.
    #[inline]
    #[must_use]
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the record and returns the underlying JSON object.
    #[inline]
    #[must_use]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for RawRecord {
    #[inline]
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A normalized, display-ready transaction.
///
/// `amount` is always finite and non-negative, in major currency units.
/// Every key of the source record other than the five canonical ones is
/// kept in `extra`, so display code can still read `risk_level`,
/// `is_fraud`, `v1..v28` and friends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTransaction {
    /// Identifier, unique within a well-formed batch.
    pub id: String,
    /// Timestamp text (ISO-8601 when the source provided one).
    pub timestamp: String,
    /// Amount in major currency units.
    pub amount: f64,
    /// Risk score, 0 when the source had none.
    pub risk_score: f64,
    /// Model confidence, 0 when the source had none.
    pub confidence: f64,
    /// Pass-through of all other source fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanonicalTransaction {
    /// Keys owned by the canonical fields; never present in `extra`.
    pub const CANONICAL_KEYS: [&'static str; 5] =
        ["id", "timestamp", "amount", "risk_score", "confidence"];

    /// Risk level reported by the backend, if it is a known bucket.
    #[inline]
    #[must_use]
    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.extra
            .get("risk_level")
            .and_then(Value::as_str)
            .and_then(|text| text.parse().ok())
    }

    /// Whether the backend flagged this transaction as fraud.
    #[inline]
    #[must_use]
    pub fn is_fraud(&self) -> bool {
        self.extra
            .get("is_fraud")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// PCA component `v<index>` when present and numeric.
    #[inline]
    #[must_use]
    pub fn component(&self, index: usize) -> Option<f64> {
        self.extra
            .get(&format!("v{index}"))
            .and_then(Value::as_f64)
    }

    /// Re-exposes the record as a [`RawRecord`] with the canonical fields
    /// written back under their own keys.
    #[must_use]
    pub fn to_raw(&self) -> RawRecord {
        let mut map = self.extra.clone();
        let _id = map.insert("id".to_owned(), Value::from(self.id.clone()));
        let _ts = map.insert("timestamp".to_owned(), Value::from(self.timestamp.clone()));
        let _amount = map.insert("amount".to_owned(), Value::from(self.amount));
        let _risk = map.insert("risk_score".to_owned(), Value::from(self.risk_score));
        let _confidence = map.insert("confidence".to_owned(), Value::from(self.confidence));
        RawRecord(map)
    }
}
