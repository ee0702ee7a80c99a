//! Page-level orchestration over the HTTP client.
//!
//! [`Dashboard`] wraps a [`FraudShieldClient`] with offline fallbacks and
//! assembles the data of each dashboard page. Page loaders issue their
//! fetches concurrently, wait for all of them, and either return the full
//! page or, if any fetch failed, the page's empty default. Only
//! cancellation escapes a loader as an error.

use chrono::Utc;
use serde::Serialize;

use crate::client::FraudShieldClient;
use crate::error::Result;
use crate::mock::{MockData, mock_prediction};
use crate::models::{
    AnalyticsSummary, CanonicalTransaction, ChatRequest, ChatResponse, ClearHistoryResponse,
    HistoryQuery, ModelInfo, PredictionRequest, PredictionResponse, RiskShare, TransactionPage,
    TrendPoint,
};
use crate::normalize::normalize_batch;
use crate::view::CancelToken;

/// Seed of the offline dataset unless one is configured.
const DEFAULT_MOCK_SEED: u64 = 42;

/// Number of recent transactions on the overview page.
const RECENT_TRANSACTIONS: u32 = 20;

/// Builder for constructing a [`Dashboard`].
#[derive(Debug)]
pub struct DashboardBuilder {
    /// Backend base URL override.
    base_url: Option<String>,
    /// Bearer token.
    token: Option<String>,
    /// Whether failed fetches are answered with mock data.
    mock_fallback: bool,
    /// Seed of the offline dataset.
    mock_seed: u64,
}

impl Default for DashboardBuilder {
    #[inline]
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            mock_fallback: true,
            mock_seed: DEFAULT_MOCK_SEED,
        }
    }
}

impl DashboardBuilder {
    /// Overrides the backend base URL.
    #[inline]
    #[must_use]
    pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets a bearer token for the backend.
    #[inline]
    #[must_use]
    pub fn token<T: Into<String>>(mut self, token: T) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Enables or disables mock fallbacks. Enabled by default.
    #[inline]
    #[must_use]
    pub const fn mock_fallback(mut self, enabled: bool) -> Self {
        self.mock_fallback = enabled;
        self
    }

    /// Seeds the offline dataset.
    #[inline]
    #[must_use]
    pub const fn mock_seed(mut self, seed: u64) -> Self {
        self.mock_seed = seed;
        self
    }

    /// Builds the dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client fails to build.
    #[inline]
    pub fn build(self) -> Result<Dashboard> {
        let mut client_builder = FraudShieldClient::builder();
        if let Some(url) = self.base_url {
            client_builder = client_builder.base_url(url);
        }
        if let Some(token) = self.token {
            client_builder = client_builder.token(token);
        }
        let client = client_builder.build()?;
        Ok(Dashboard {
            client,
            mock: MockData::generate(self.mock_seed),
            mock_fallback: self.mock_fallback,
        })
    }
}

/// Data of the overview page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverviewPage {
    /// Headline numbers; `None` when the page fell back.
    pub summary: Option<AnalyticsSummary>,
    /// Hourly fraud trend.
    pub trends: Vec<TrendPoint>,
    /// Predictions per risk bucket.
    pub risk_distribution: Vec<RiskShare>,
    /// Most recent transactions, normalized.
    pub recent_transactions: Vec<CanonicalTransaction>,
}

/// Data of the analytics page.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsPage {
    /// Model quality metrics; `None` when the page fell back.
    pub model_info: Option<ModelInfo>,
    /// Hourly fraud trend.
    pub trends: Vec<TrendPoint>,
    /// Predictions per risk bucket.
    pub risk_distribution: Vec<RiskShare>,
}

/// Data of one history page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySnapshot {
    /// Normalized records in backend order.
    pub transactions: Vec<CanonicalTransaction>,
    /// Total matching predictions.
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    /// Total pages, at least 1.
    pub total_pages: u32,
}

impl Default for HistorySnapshot {
    #[inline]
    fn default() -> Self {
        Self::from(TransactionPage::default())
    }
}

impl From<TransactionPage> for HistorySnapshot {
    #[inline]
    fn from(page: TransactionPage) -> Self {
        Self {
            transactions: normalize_batch(&page.transactions),
            total: page.total,
            page: page.page,
            total_pages: page.total_pages,
        }
    }
}

/// Dashboard data source with optional offline fallbacks.
///
/// Use [`Dashboard::builder()`] to construct an instance.
#[derive(Debug)]
pub struct Dashboard {
    /// Low-level HTTP client.
    client: FraudShieldClient,
    /// Offline dataset.
    mock: MockData,
    /// Whether failed fetches are answered with mock data.
    mock_fallback: bool,
}

impl Dashboard {
    /// Creates a new builder for configuring the dashboard.
    #[inline]
    #[must_use]
    pub fn builder() -> DashboardBuilder {
        DashboardBuilder::default()
    }

    /// Returns a reference to the underlying HTTP client.
    #[inline]
    #[must_use]
    pub const fn inner_client(&self) -> &FraudShieldClient {
        &self.client
    }

    /// Returns the offline dataset.
    #[inline]
    #[must_use]
    pub const fn mock_data(&self) -> &MockData {
        &self.mock
    }

    /// Substitutes mock data for a failed fetch when fallbacks are on.
    fn or_mock<T, F>(&self, endpoint: &'static str, result: Result<T>, mock: F) -> Result<T>
    where
        F: FnOnce(&MockData) -> T,
    {
        match result {
            Ok(value) => Ok(value),
            Err(err) if self.mock_fallback => {
                tracing::warn!(endpoint, error = %err, "backend unavailable, serving mock data");
                Ok(mock(&self.mock))
            }
            Err(err) => Err(err),
        }
    }

    /// Headline numbers derived from the history statistics.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the backend fails and fallbacks are off.
    #[tracing::instrument(skip_all)]
    pub async fn summary(&self) -> Result<AnalyticsSummary> {
        let result = self
            .client
            .history_stats()
            .await
            .map(|stats| AnalyticsSummary::from_stats(&stats, Utc::now()));
        self.or_mock("summary", result, MockData::summary)
    }

    /// Predictions per risk bucket.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the backend fails and fallbacks are off.
    #[tracing::instrument(skip_all)]
    pub async fn risk_distribution(&self) -> Result<Vec<RiskShare>> {
        let result = self
            .client
            .history_stats()
            .await
            .map(|stats| stats.risk_shares());
        self.or_mock("risk_distribution", result, MockData::risk_distribution)
    }

    /// Hourly fraud trend.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the backend fails and fallbacks are off.
    #[tracing::instrument(skip_all)]
    pub async fn trends(&self) -> Result<Vec<TrendPoint>> {
        let result = self.client.trends().await;
        self.or_mock("trends", result, MockData::trends)
    }

    /// Model quality metrics.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the backend fails and fallbacks are off.
    #[tracing::instrument(skip_all)]
    pub async fn model_info(&self) -> Result<ModelInfo> {
        let result = self.client.model_info().await;
        self.or_mock("model_info", result, MockData::model_info)
    }

    /// One page of raw history records.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the backend fails and fallbacks are off.
    #[tracing::instrument(skip_all, fields(page = query.page))]
    pub async fn transactions(&self, query: &HistoryQuery) -> Result<TransactionPage> {
        let result = self.client.history(query).await;
        self.or_mock("transactions", result, |mock| mock.page(query))
    }

    /// Scores one transaction.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the backend fails and fallbacks are off.
    #[tracing::instrument(skip_all)]
    pub async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse> {
        let result = self.client.predict(request).await;
        self.or_mock("predict", result, |_| {
            mock_prediction(request, &mut rand::rng())
        })
    }

    /// Deletes the stored history. Never falls back to mock data.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the backend fails.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn clear_history(&self) -> Result<ClearHistoryResponse> {
        self.client.clear_history().await
    }

    /// Sends a message to the fraud assistant. Never falls back to mock
    /// data.
    ///
    /// # Errors
    ///
    /// Returns the fetch error if the backend fails.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        self.client.chat(request).await
    }

    /// Loads the overview page: summary, trend, risk distribution and the
    /// first page of history, fetched concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FraudShieldError::Cancelled`] if `token` is
    /// cancelled before all fetches complete.
    #[tracing::instrument(skip_all)]
    pub async fn load_overview(&self, token: &CancelToken) -> Result<OverviewPage> {
        let recent_query = HistoryQuery::new().items_per_page(RECENT_TRANSACTIONS);
        let fetched = token
            .run(async {
                tokio::join!(
                    self.summary(),
                    self.trends(),
                    self.risk_distribution(),
                    self.transactions(&recent_query),
                )
            })
            .await?;

        match fetched {
            (Ok(summary), Ok(trends), Ok(risk_distribution), Ok(recent)) => Ok(OverviewPage {
                summary: Some(summary),
                trends,
                risk_distribution,
                recent_transactions: normalize_batch(&recent.transactions),
            }),
            (summary, trends, risk_distribution, recent) => {
                let errors = [
                    summary.err(),
                    trends.err(),
                    risk_distribution.err(),
                    recent.err(),
                ];
                for err in errors.iter().flatten() {
                    tracing::error!(error = %err, "overview fetch failed");
                }
                Ok(OverviewPage::default())
            }
        }
    }

    /// Loads the analytics page: model metrics, trend and risk
    /// distribution, fetched concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FraudShieldError::Cancelled`] if `token` is
    /// cancelled before all fetches complete.
    #[tracing::instrument(skip_all)]
    pub async fn load_analytics(&self, token: &CancelToken) -> Result<AnalyticsPage> {
        let fetched = token
            .run(async { tokio::join!(self.model_info(), self.trends(), self.risk_distribution()) })
            .await?;

        match fetched {
            (Ok(model_info), Ok(trends), Ok(risk_distribution)) => Ok(AnalyticsPage {
                model_info: Some(model_info),
                trends,
                risk_distribution,
            }),
            (model_info, trends, risk_distribution) => {
                let errors = [model_info.err(), trends.err(), risk_distribution.err()];
                for err in errors.iter().flatten() {
                    tracing::error!(error = %err, "analytics fetch failed");
                }
                Ok(AnalyticsPage::default())
            }
        }
    }

    /// Loads one history page and normalizes its records.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::FraudShieldError::Cancelled`] if `token` is
    /// cancelled before the fetch completes.
    #[tracing::instrument(skip_all, fields(page = query.page))]
    pub async fn load_history(&self, query: &HistoryQuery, token: &CancelToken) -> Result<HistorySnapshot> {
        match token.run(self.transactions(query)).await? {
            Ok(page) => Ok(HistorySnapshot::from(page)),
            Err(err) => {
                tracing::error!(error = %err, "history fetch failed");
                Ok(HistorySnapshot::default())
            }
        }
    }
}
