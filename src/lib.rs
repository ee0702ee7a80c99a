//! Client library for the `FraudShield` fraud-detection dashboard.
//!
//! The crate talks to the `FraudShield` scoring backend and turns its
//! loosely shaped transaction records into a canonical form the dashboard
//! can sort and display:
//!
//! - [`normalize`] resolves amounts from heterogeneous records, rescales
//!   batches reported in minor units, and sorts canonical records.
//! - [`client`] is the typed HTTP client, and [`dashboard`] layers offline
//!   fallbacks and page loaders on top of it.
//! - [`view`] and [`history`] hold per-page state and cancel fetches whose
//!   view has closed.
//! - [`auth`] and [`storage`] implement the demo login flow.
//!
//! # Example
//!
//! ```
//! use fraudshield::models::RawRecord;
//! use fraudshield::normalize::normalize_batch;
//! use serde_json::json;
//!
//! let batch = [
//!     RawRecord::from_value(json!({"id": "a", "amount": 150_000})),
//!     RawRecord::from_value(json!({"id": "b", "amount": "$2,500"})),
//! ];
//! let rows = normalize_batch(&batch);
//! assert_eq!(rows[0].amount, 1500.0);
//! assert_eq!(rows[1].amount, 25.0);
//! ```

pub mod auth;
#[cfg(feature = "async")]
pub mod client;
#[cfg(feature = "async")]
pub mod dashboard;
pub mod error;
pub mod format;
#[cfg(feature = "async")]
pub mod history;
pub mod mock;
pub mod models;
pub mod normalize;
pub mod storage;
pub mod timestamp;
#[cfg(feature = "async")]
pub mod view;

#[cfg(feature = "async")]
pub use client::FraudShieldClient;
#[cfg(feature = "async")]
pub use dashboard::Dashboard;
pub use error::{FraudShieldError, Result};
