//! Data models for FraudShield API entities.
//!
//! This module contains strongly-typed representations of the scoring
//! backend's payloads (assistant chat included), the raw and canonical
//! transaction records, newtype ID wrappers, and the dashboard user model.

mod analytics;
mod chat;
mod history;
mod ids;
mod prediction;
mod risk;
mod transaction;
mod user;

pub(crate) use analytics::TrendsPayload;
pub use analytics::{AnalyticsSummary, HistoryStats, ModelInfo, RiskCounts, RiskShare, TrendPoint};
pub use chat::{ChatRequest, ChatResponse, ChatTransaction, ChatVerdict};
pub(crate) use history::HistoryPageWire;
pub use history::{ClearHistoryResponse, DEFAULT_ITEMS_PER_PAGE, HistoryQuery, TransactionPage};
pub use ids::{TransactionId, UserId};
pub use prediction::{
    COMPONENT_COUNT, Factor, PcaComponents, PredictionRequest, PredictionResponse,
};
pub use risk::RiskLevel;
pub use transaction::{CanonicalTransaction, RawRecord};
pub use user::{AuthSession, StoredUser, User, UserRole};
