//! Prediction history paging models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{RawRecord, RiskLevel};

/// Default page size of the history endpoint.
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 20;

/// Filters and paging for `GET /predict/history`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub items_per_page: u32,
    /// Only predictions in this bucket.
    pub risk_level: Option<RiskLevel>,
    /// Only predictions with this fraud flag.
    pub is_fraud: Option<bool>,
}

impl Default for HistoryQuery {
    #[inline]
    fn default() -> Self {
        Self {
            page: 1,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            risk_level: None,
            is_fraud: None,
        }
    }
}

impl HistoryQuery {
    /// First page with the default page size and no filters.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a page; values below 1 are raised to 1.
    #[inline]
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = if page == 0 { 1 } else { page };
        self
    }

    /// Sets the page size; values below 1 are raised to 1.
    #[inline]
    #[must_use]
    pub const fn items_per_page(mut self, items: u32) -> Self {
        self.items_per_page = if items == 0 { 1 } else { items };
        self
    }

    /// Restricts to one risk bucket.
    #[inline]
    #[must_use]
    pub const fn risk_level(mut self, level: RiskLevel) -> Self {
        self.risk_level = Some(level);
        self
    }

    /// Restricts to fraud or non-fraud predictions.
    #[inline]
    #[must_use]
    pub const fn is_fraud(mut self, flag: bool) -> Self {
        self.is_fraud = Some(flag);
        self
    }

    /// Query-string pairs in the order the backend documents them.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("items_per_page", self.items_per_page.to_string()),
        ];
        if let Some(level) = self.risk_level {
            pairs.push(("risk_level", level.as_str().to_owned()));
        }
        if let Some(flag) = self.is_fraud {
            pairs.push(("is_fraud", flag.to_string()));
        }
        pairs
    }
}

/// Wire shape of `GET /predict/history`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct HistoryPageWire {
    /// Records of the page, shape not guaranteed.
    data: Value,
    /// Page returned.
    page: u32,
    /// Total matching predictions.
    total_items: u64,
    /// Total pages.
    total_pages: u32,
}

impl Default for HistoryPageWire {
    fn default() -> Self {
        Self {
            data: Value::Null,
            page: 1,
            total_items: 0,
            total_pages: 1,
        }
    }
}

impl From<HistoryPageWire> for TransactionPage {
    fn from(wire: HistoryPageWire) -> Self {
        let transactions = match wire.data {
            Value::Array(items) => items.into_iter().map(RawRecord::from_value).collect(),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Object(_) => {
                Vec::new()
            }
        };
        Self {
            transactions,
            total: wire.total_items,
            page: wire.page.max(1),
            total_pages: wire.total_pages.max(1),
        }
    }
}

/// One page of raw history records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionPage {
    /// Records of the page, not yet normalized.
    pub transactions: Vec<RawRecord>,
    /// Total matching predictions.
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    /// Total pages, at least 1.
    pub total_pages: u32,
}

impl Default for TransactionPage {
    #[inline]
    fn default() -> Self {
        Self {
            transactions: Vec::new(),
            total: 0,
            page: 1,
            total_pages: 1,
        }
    }
}

/// Response of `DELETE /predict/history`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearHistoryResponse {
    /// Human-readable confirmation.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_include_filters_only_when_set() {
        let plain = HistoryQuery::new().to_pairs();
        assert_eq!(
            plain,
            vec![("page", "1".to_owned()), ("items_per_page", "20".to_owned())]
        );

        let filtered = HistoryQuery::new()
            .page(3)
            .items_per_page(50)
            .risk_level(RiskLevel::High)
            .is_fraud(true)
            .to_pairs();
        assert_eq!(filtered.len(), 4);
        assert_eq!(filtered[2], ("risk_level", "HIGH".to_owned()));
        assert_eq!(filtered[3], ("is_fraud", "true".to_owned()));
    }

    #[test]
    fn query_clamps_zero() {
        let query = HistoryQuery::new().page(0).items_per_page(0);
        assert_eq!(query.page, 1);
        assert_eq!(query.items_per_page, 1);
    }

    #[test]
    fn page_wire_full() {
        let json = r#"{
            "data": [{"transaction_id": "a", "amount": 10}, null],
            "page": 2,
            "items_per_page": 20,
            "total_items": 41,
            "total_pages": 3,
            "has_next": true
        }"#;
        let wire: HistoryPageWire = serde_json::from_str(json).unwrap();
        let page = TransactionPage::from(wire);
        assert_eq!(page.transactions.len(), 2);
        assert_eq!(page.transactions[1], RawRecord::new());
        assert_eq!(page.total, 41);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn page_wire_defaults() {
        let wire: HistoryPageWire = serde_json::from_str(r#"{"total_pages": 0}"#).unwrap();
        let page = TransactionPage::from(wire);
        assert!(page.transactions.is_empty());
        assert_eq!(page.total, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
    }
}
