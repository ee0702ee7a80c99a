//! Transaction normalization and sorting pipeline.
//!
//! History records arrive in whatever shape the backend (or an older
//! export) produced. This module turns each one into a
//! [`CanonicalTransaction`](crate::models::CanonicalTransaction):
//!
//! 1. [`extract_amount`] finds the amount among known field names and
//!    nested shapes,
//! 2. [`compute_divisor`] decides once per batch whether amounts are in
//!    cents,
//! 3. [`normalize_batch`] builds the canonical records,
//! 4. [`sort`] orders them for display.

mod amount;
mod record;
mod scale;
mod sort;

pub use amount::{AMOUNT_SOURCES, AmountSource, AmountValue, extract_amount, parse_amount, parse_amount_text};
pub use record::{normalize, normalize_at, normalize_batch};
pub use scale::{Divisor, compute_divisor};
pub use sort::{SortDirection, SortField, SortState, sort};
