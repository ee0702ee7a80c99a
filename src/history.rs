//! State of the history page: paging, filters, sort and the current batch.

use crate::dashboard::{Dashboard, HistorySnapshot};
use crate::error::Result;
use crate::models::{CanonicalTransaction, HistoryQuery, RiskLevel};
use crate::normalize::{SortField, SortState};
use crate::view::CancelToken;

/// In-memory state of one history page view.
///
/// The batch is replaced wholesale on every [`HistoryView::refresh`] and
/// never edited in place; sorting happens on read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryView {
    /// Paging and filters of the next fetch.
    query: HistoryQuery,
    /// Current table sort.
    sort: SortState,
    /// Last fetched batch.
    snapshot: HistorySnapshot,
}

impl HistoryView {
    /// Creates a view on page 1 with default page size, no filters and the
    /// default sort (newest first).
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Query the next refresh will send.
    #[inline]
    #[must_use]
    pub const fn query(&self) -> &HistoryQuery {
        &self.query
    }

    /// Current sort.
    #[inline]
    #[must_use]
    pub const fn sort_state(&self) -> SortState {
        self.sort
    }

    /// Last fetched batch with its totals.
    #[inline]
    #[must_use]
    pub const fn snapshot(&self) -> &HistorySnapshot {
        &self.snapshot
    }

    /// Moves to `page`, keeping size and filters.
    #[inline]
    pub const fn set_page(&mut self, page: u32) {
        self.query = self.query.page(page);
    }

    /// Changes the page size and returns to page 1.
    #[inline]
    pub const fn set_items_per_page(&mut self, items: u32) {
        self.query = self.query.items_per_page(items).page(1);
    }

    /// Replaces the filters and returns to page 1.
    #[inline]
    pub const fn set_filters(&mut self, risk_level: Option<RiskLevel>, is_fraud: Option<bool>) {
        self.query.risk_level = risk_level;
        self.query.is_fraud = is_fraud;
        self.query = self.query.page(1);
    }

    /// Applies a column selection to the sort.
    #[inline]
    pub fn select_sort(&mut self, field: SortField) {
        self.sort.select(field);
    }

    /// Drops the batch after the backend history was cleared.
    #[inline]
    pub fn clear(&mut self) {
        self.snapshot = HistorySnapshot::default();
        self.query = self.query.page(1);
    }

    /// Fetches the current query and replaces the batch.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FraudShieldError::Cancelled`] if `token` is
    /// cancelled first; the previous batch is then left untouched.
    pub async fn refresh(&mut self, dashboard: &Dashboard, token: &CancelToken) -> Result<()> {
        let snapshot = dashboard.load_history(&self.query, token).await?;
        tracing::debug!(
            records = snapshot.transactions.len(),
            total = snapshot.total,
            "history refreshed"
        );
        self.snapshot = snapshot;
        Ok(())
    }

    /// Batch sorted by the current sort state.
    #[inline]
    #[must_use]
    pub fn rows(&self) -> Vec<CanonicalTransaction> {
        self.sort.apply(&self.snapshot.transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FraudShieldError;
    use crate::normalize::SortDirection;
    use crate::view::ViewScope;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn dashboard(server: &MockServer) -> Dashboard {
        Dashboard::builder()
            .base_url(format!("{}/api/v1", server.uri()))
            .mock_fallback(false)
            .build()
            .unwrap()
    }

    #[test]
    fn paging_and_filter_changes_reset_page() {
        let mut view = HistoryView::new();
        view.set_page(4);
        assert_eq!(view.query().page, 4);

        view.set_items_per_page(50);
        assert_eq!(view.query().page, 1);
        assert_eq!(view.query().items_per_page, 50);

        view.set_page(3);
        view.set_filters(Some(RiskLevel::High), Some(true));
        assert_eq!(view.query().page, 1);
        assert_eq!(view.query().risk_level, Some(RiskLevel::High));
        assert_eq!(view.query().is_fraud, Some(true));
        assert_eq!(view.query().items_per_page, 50);
    }

    #[test]
    fn sort_selection_toggles() {
        let mut view = HistoryView::new();
        view.select_sort(SortField::Amount);
        assert_eq!(view.sort_state().field, SortField::Amount);
        assert_eq!(view.sort_state().direction, SortDirection::Descending);
        view.select_sort(SortField::Amount);
        assert_eq!(view.sort_state().direction, SortDirection::Ascending);
    }

    #[tokio::test]
    async fn refresh_replaces_batch_and_rows_are_sorted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/predict/history"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"transaction_id": "old", "amount": 5.5, "timestamp": "2024-01-15T08:00:00"},
                    {"transaction_id": "new", "amount": 1.5, "timestamp": "2024-01-15T09:00:00"},
                    {"transaction_id": "mid", "amount": 3.5, "timestamp": "2024-01-15T08:30:00"}
                ],
                "page": 1,
                "total_items": 3,
                "total_pages": 1
            })))
            .mount(&server)
            .await;

        let dash = dashboard(&server);
        let scope = ViewScope::new();
        let mut view = HistoryView::new();
        view.refresh(&dash, &scope.token()).await.unwrap();
        assert_eq!(view.snapshot().total, 3);

        let by_time: Vec<String> = view.rows().into_iter().map(|tx| tx.id).collect();
        assert_eq!(by_time, vec!["new", "mid", "old"]);

        view.select_sort(SortField::Amount);
        view.select_sort(SortField::Amount);
        let by_amount: Vec<f64> = view.rows().iter().map(|tx| tx.amount).collect();
        assert_eq!(by_amount, vec![1.5, 3.5, 5.5]);

        // snapshot keeps backend order
        assert_eq!(view.snapshot().transactions[0].id, "old");
    }

    #[tokio::test]
    async fn cancelled_refresh_keeps_previous_batch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/predict/history"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"transaction_id": "kept", "amount": 1}],
                "total_items": 1
            })))
            .mount(&server)
            .await;

        let dash = dashboard(&server);
        let mut view = HistoryView::new();
        let live = ViewScope::new();
        view.refresh(&dash, &live.token()).await.unwrap();
        assert_eq!(view.rows().len(), 1);

        let closed = ViewScope::new();
        let token = closed.token();
        closed.cancel();
        let err = view.refresh(&dash, &token).await.unwrap_err();
        assert!(matches!(err, FraudShieldError::Cancelled));
        assert_eq!(view.rows()[0].id, "kept");
    }

    #[test]
    fn clear_empties_batch() {
        let mut view = HistoryView::new();
        view.set_page(2);
        view.clear();
        assert!(view.rows().is_empty());
        assert_eq!(view.query().page, 1);
        assert_eq!(view.snapshot().total_pages, 1);
    }
}
