//! Identifier newtypes.
//!
//! Users and scored transactions are both keyed by strings on the wire;
//! the wrappers keep the two apart.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of transaction identifiers minted on the client side.
const TRANSACTION_PREFIX: &str = "txn_";

/// Length of the random part of a minted transaction identifier.
const GENERATED_SUFFIX_LEN: usize = 9;

/// Identifier of a dashboard user. Sequential decimal numbers in practice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps an identifier as-is.
    #[inline]
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self(value)
    }

    /// Identifier of the `position`-th registered user (1-based).
    #[inline]
    #[must_use]
    pub fn sequential(position: usize) -> Self {
        Self(position.to_string())
    }

    /// Borrowed identifier text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    #[inline]
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Identifier the scoring backend assigns to a scored transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Wraps an identifier as-is.
    #[inline]
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self(value)
    }

    /// Builds a `txn_<suffix>` identifier.
    #[inline]
    #[must_use]
    pub fn with_suffix(suffix: &str) -> Self {
        Self(format!("{TRANSACTION_PREFIX}{suffix}"))
    }

    /// Mints a random `txn_` identifier for predictions the backend left
    /// unnamed.
    #[must_use]
    pub fn generate() -> Self {
        let simple = uuid::Uuid::new_v4().simple().to_string();
        let suffix: String = simple.chars().take(GENERATED_SUFFIX_LEN).collect();
        Self::with_suffix(&suffix)
    }

    /// Borrowed identifier text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TransactionId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    #[inline]
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}
