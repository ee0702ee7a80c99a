//! Async HTTP client for the FraudShield scoring backend.

use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret as _, SecretString};
use serde::de::DeserializeOwned;

use crate::error::{FraudShieldError, Result};
use crate::models::{
    ChatRequest, ChatResponse, ClearHistoryResponse, HistoryPageWire, HistoryQuery, HistoryStats,
    ModelInfo, PredictionRequest, PredictionResponse, TransactionPage, TrendPoint, TrendsPayload,
};

/// Base URL of a locally running backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Scoring endpoint path.
const PREDICT_PATH: &str = "/predict";

/// Prediction history path.
const HISTORY_PATH: &str = "/predict/history";

/// History statistics path.
const HISTORY_STATS_PATH: &str = "/predict/history/stats";

/// Hourly trend path.
const TRENDS_PATH: &str = "/analytics/trends";

/// Model metrics path.
const MODEL_INFO_PATH: &str = "/model/info";

/// Assistant chat path.
const CHAT_PATH: &str = "/chat";

/// Builder for constructing a [`FraudShieldClient`].
#[derive(Debug, Default)]
pub struct FraudShieldClientBuilder {
    /// Bearer token sent with every request, if any.
    token: Option<SecretString>,
    /// Base URL override.
    base_url: Option<String>,
}

impl FraudShieldClientBuilder {
    /// Sets a bearer token. The demo backend accepts anonymous requests, so
    /// this is optional.
    #[inline]
    #[must_use]
    pub fn token<T: Into<String>>(mut self, token: T) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Overrides the base URL (useful for testing with a mock server).
    #[inline]
    #[must_use]
    pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns [`FraudShieldError::InvalidInput`] if the base URL is blank.
    /// Returns [`FraudShieldError::Http`] if the HTTP client fails to build.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub fn build(self) -> Result<FraudShieldClient> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
            .trim()
            .trim_end_matches('/')
            .to_owned();
        if base_url.is_empty() {
            return Err(FraudShieldError::InvalidInput(
                "base URL must not be empty".to_owned(),
            ));
        }
        tracing::debug!(base_url = %base_url, authenticated = self.token.is_some(), "building client");
        let http = reqwest::Client::builder().build()?;

        Ok(FraudShieldClient {
            http,
            token: self.token,
            base_url,
        })
    }
}

/// Async client for the FraudShield backend.
///
/// Use [`FraudShieldClient::builder()`] to construct an instance. Every
/// method maps to one endpoint; none of them retries.
#[derive(Debug, Clone)]
pub struct FraudShieldClient {
    /// Underlying HTTP client.
    http: reqwest::Client,
    /// Bearer token, if any.
    token: Option<SecretString>,
    /// API base URL without a trailing slash.
    base_url: String,
}

impl FraudShieldClient {
    /// Creates a new builder for configuring the client.
    #[inline]
    #[must_use]
    pub fn builder() -> FraudShieldClientBuilder {
        FraudShieldClientBuilder::default()
    }

    /// Base URL requests are sent to.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Scores one transaction via `POST /predict`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the server returns a
    /// non-success status, or the response cannot be deserialized.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse> {
        tracing::debug!(amount = request.amount, "scoring transaction");
        let request_builder = self.request(reqwest::Method::POST, PREDICT_PATH).json(request);
        Self::send(request_builder).await
    }

    /// Fetches one page of prediction history via `GET /predict/history`.
    ///
    /// The records are returned raw; run them through
    /// [`crate::normalize::normalize_batch`] before display.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the server returns a
    /// non-success status, or the response cannot be deserialized.
    #[inline]
    #[tracing::instrument(skip_all, fields(page = query.page))]
    pub async fn history(&self, query: &HistoryQuery) -> Result<TransactionPage> {
        let request_builder = self
            .request(reqwest::Method::GET, HISTORY_PATH)
            .query(&query.to_pairs());
        let wire: HistoryPageWire = Self::send(request_builder).await?;
        Ok(TransactionPage::from(wire))
    }

    /// Fetches aggregate history statistics via
    /// `GET /predict/history/stats`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the server returns a
    /// non-success status, or the response cannot be deserialized.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn history_stats(&self) -> Result<HistoryStats> {
        self.get_json(HISTORY_STATS_PATH).await
    }

    /// Fetches the hourly fraud trend via `GET /analytics/trends`.
    ///
    /// Accepts both a bare list and a `{ "data": [...] }` wrapper.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the server returns a
    /// non-success status, or the response cannot be deserialized.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn trends(&self) -> Result<Vec<TrendPoint>> {
        let payload: TrendsPayload = self.get_json(TRENDS_PATH).await?;
        Ok(payload.into_points())
    }

    /// Fetches model quality metrics via `GET /model/info`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the server returns a
    /// non-success status, or the response cannot be deserialized.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn model_info(&self) -> Result<ModelInfo> {
        self.get_json(MODEL_INFO_PATH).await
    }

    /// Deletes all stored predictions via `DELETE /predict/history`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the server returns a
    /// non-success status, or the response cannot be deserialized.
    #[inline]
    #[tracing::instrument(skip_all)]
    pub async fn clear_history(&self) -> Result<ClearHistoryResponse> {
        tracing::info!("clearing prediction history");
        let request_builder = self.request(reqwest::Method::DELETE, HISTORY_PATH);
        Self::send(request_builder).await
    }

    /// Sends one message to the fraud assistant via `POST /chat`.
    ///
    /// Pass the returned [`ChatResponse::session_id`] back in the next
    /// request to continue the conversation.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails, the server returns a
    /// non-success status, or the response cannot be deserialized.
    #[inline]
    #[tracing::instrument(skip_all, fields(session = request.session_id.as_deref()))]
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let request_builder = self.request(reqwest::Method::POST, CHAT_PATH).json(request);
        Self::send(request_builder).await
    }

    /// Sends a GET request and deserializes the response.
    async fn get_json<Resp: DeserializeOwned>(&self, path: &str) -> Result<Resp> {
        let request_builder = self.request(reqwest::Method::GET, path);
        Self::send(request_builder).await
    }

    /// Starts a request to `path`, attaching the bearer token if set.
    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        tracing::trace!(method = %method, url = %url, "preparing request");
        let request_builder = self.http.request(method, url);
        match self.token.as_ref() {
            Some(token) => {
                request_builder.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()))
            }
            None => request_builder,
        }
    }

    /// Sends a prepared request and hands the response to
    /// [`Self::handle_response`].
    async fn send<Resp: DeserializeOwned>(request_builder: reqwest::RequestBuilder) -> Result<Resp> {
        let response = request_builder.send().await?;
        Self::handle_response(response).await
    }

    /// Handles an HTTP response, checking status and deserializing the body.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        tracing::debug!(status = %status, "received response");
        if status.is_success() {
            let body = response.text().await?;
            tracing::trace!(body_len = body.len(), "parsing response body");
            serde_json::from_str(&body).map_err(FraudShieldError::from)
        } else {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_owned());
            tracing::debug!(status = status.as_u16(), message = %message, "API error");
            Err(FraudShieldError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}
