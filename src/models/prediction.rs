//! Prediction request and response models.

use chrono::{SecondsFormat, Utc};
use serde::ser::SerializeMap as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::{RiskLevel, TransactionId};
use crate::error::{FraudShieldError, Result};

/// Number of anonymized PCA components the model consumes.
pub const COMPONENT_COUNT: usize = 28;

/// The 28 PCA components (`v1..v28`) of a card transaction.
///
/// Serialized as flat `v1`..`v28` keys so it can be flattened into a
/// [`PredictionRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PcaComponents([f64; COMPONENT_COUNT]);

impl PcaComponents {
    /// Returns component `v<index>` (1-based).
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        index
            .checked_sub(1)
            .and_then(|slot| self.0.get(slot))
            .copied()
    }

    /// Sets component `v<index>` (1-based).
    ///
    /// # Errors
    ///
    /// Returns [`FraudShieldError::InvalidInput`] if `index` is not in
    /// `1..=28` or `value` is not finite.
    #[inline]
    pub fn set(&mut self, index: usize, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(FraudShieldError::InvalidInput(format!(
                "component v{index} must be finite"
            )));
        }
        let slot = index
            .checked_sub(1)
            .and_then(|slot| self.0.get_mut(slot))
            .ok_or_else(|| {
                FraudShieldError::InvalidInput(format!(
                    "component index {index} is outside 1..={COMPONENT_COUNT}"
                ))
            })?;
        *slot = value;
        Ok(())
    }
}

impl Serialize for PcaComponents {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(COMPONENT_COUNT))?;
        for (slot, value) in self.0.iter().enumerate() {
            map.serialize_entry(&format!("v{}", slot + 1), value)?;
        }
        map.end()
    }
}

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    /// Transaction amount in major currency units.
    pub amount: f64,
    /// Seconds elapsed since the first transaction of the dataset.
    pub time: f64,
    /// PCA components, zero unless set.
    #[serde(flatten)]
    pub components: PcaComponents,
}

impl PredictionRequest {
    /// Creates a request with all PCA components zeroed.
    #[inline]
    #[must_use]
    pub fn new(amount: f64, time: f64) -> Self {
        Self {
            amount,
            time,
            components: PcaComponents::default(),
        }
    }

    /// Sets component `v<index>` and returns the request.
    ///
    /// # Errors
    ///
    /// See [`PcaComponents::set`].
    #[inline]
    pub fn with_component(mut self, index: usize, value: f64) -> Result<Self> {
        self.components.set(index, value)?;
        Ok(self)
    }
}

/// One explanatory factor attached to a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    /// Feature name, e.g. `"Amount"` or `"V14"`.
    pub feature: String,
    /// Qualitative impact (`"High"`, `"Medium"`, `"Low"`).
    pub impact: String,
    /// Feature value fed to the model.
    pub value: f64,
}

/// Scoring result for one transaction.
///
/// Deserialization is tolerant: missing fields take defaults, an unknown
/// risk level reads as [`RiskLevel::Low`], and malformed factors are
/// dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WirePrediction")]
pub struct PredictionResponse {
    /// Backend-assigned identifier.
    pub transaction_id: TransactionId,
    /// Whether the model flagged the transaction.
    pub is_fraud: bool,
    /// Model fraud probability in `[0, 1]`.
    pub fraud_probability: f64,
    /// Risk score in `[0, 100]`.
    pub risk_score: f64,
    /// Risk bucket.
    pub risk_level: RiskLevel,
    /// Model confidence in `[0, 1]`.
    pub confidence: f64,
    /// Explanatory factors.
    pub factors: Vec<Factor>,
    /// Scoring time.
    pub timestamp: String,
}

/// Loose wire shape of a prediction, before defaults are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WirePrediction {
    /// Backend identifier.
    transaction_id: Option<String>,
    /// Fraud flag.
    is_fraud: Option<bool>,
    /// Fraud probability.
    fraud_probability: Option<f64>,
    /// Risk score.
    risk_score: Option<f64>,
    /// Risk bucket as text.
    risk_level: Option<String>,
    /// Confidence.
    confidence: Option<f64>,
    /// Factor list of unknown shape.
    factors: Option<Value>,
    /// Scoring time.
    timestamp: Option<String>,
}

impl From<WirePrediction> for PredictionResponse {
    fn from(wire: WirePrediction) -> Self {
        let factors = match wire.factors {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            Some(_) | None => Vec::new(),
        };
        Self {
            transaction_id: wire
                .transaction_id
                .filter(|id| !id.is_empty())
                .map_or_else(TransactionId::generate, TransactionId::new),
            is_fraud: wire.is_fraud.unwrap_or(false),
            fraud_probability: wire.fraud_probability.unwrap_or(0.0),
            risk_score: wire.risk_score.unwrap_or(0.0),
            risk_level: wire
                .risk_level
                .and_then(|text| text.parse().ok())
                .unwrap_or(RiskLevel::Low),
            confidence: wire.confidence.unwrap_or(0.0),
            factors,
            timestamp: wire
                .timestamp
                .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_flat_components() {
        let request = PredictionRequest::new(149.62, 0.0)
            .with_component(14, -0.311)
            .unwrap();
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["amount"], json!(149.62));
        assert_eq!(value["v14"], json!(-0.311));
        assert_eq!(value["v1"], json!(0.0));
        assert_eq!(value["v28"], json!(0.0));
        assert!(value.get("v29").is_none());
        assert!(value.get("components").is_none());
    }

    #[test]
    fn component_index_is_checked() {
        let mut components = PcaComponents::default();
        assert!(components.set(0, 1.0).is_err());
        assert!(components.set(29, 1.0).is_err());
        assert!(components.set(3, f64::NAN).is_err());
        components.set(28, 2.0).unwrap();
        assert_eq!(components.get(28), Some(2.0));
        assert_eq!(components.get(0), None);
    }

    #[test]
    fn response_full_payload() {
        let json = r#"{
            "transaction_id": "4b1c",
            "is_fraud": true,
            "fraud_probability": 0.83,
            "risk_score": 83,
            "risk_level": "CRITICAL",
            "confidence": 0.83,
            "factors": [
                {"feature": "Amount", "impact": "High", "value": 250.0},
                {"feature": "Time", "impact": "Medium", "value": 406}
            ],
            "timestamp": "2024-01-15T10:30:00.123456",
            "merchant": "Online"
        }"#;
        let response: PredictionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.transaction_id, TransactionId::from("4b1c"));
        assert!(response.is_fraud);
        assert_eq!(response.risk_level, RiskLevel::Critical);
        assert_eq!(response.factors.len(), 2);
        assert_eq!(response.timestamp, "2024-01-15T10:30:00.123456");
    }

    #[test]
    fn response_defaults_missing_fields() {
        let response: PredictionResponse = serde_json::from_str("{}").unwrap();
        assert!(response.transaction_id.as_str().starts_with("txn_"));
        assert_eq!(response.transaction_id.as_str().len(), 13);
        assert!(!response.is_fraud);
        assert_eq!(response.risk_level, RiskLevel::Low);
        assert!(response.factors.is_empty());
        assert!(!response.timestamp.is_empty());
    }

    #[test]
    fn response_tolerates_bad_factors_and_level() {
        let json = r#"{
            "risk_level": "SEVERE",
            "factors": [{"feature": "Amount"}, {"feature": "V14", "impact": "Low", "value": 1.5}]
        }"#;
        let response: PredictionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.risk_level, RiskLevel::Low);
        assert_eq!(response.factors.len(), 1);

        let scalar: PredictionResponse = serde_json::from_str(r#"{"factors": "none"}"#).unwrap();
        assert!(scalar.factors.is_empty());
    }
}
