//! Batch-wide minor-unit detection.
//!
//! Some sources report amounts in cents. Nothing in a record says so, so
//! the decision is a heuristic over the whole batch: large, all-integral
//! amounts are taken to be cents. It is a best-effort guess and can be
//! wrong for legitimately large whole-dollar amounts or mixed currencies.

/// Integral check tolerance.
const INTEGER_TOLERANCE: f64 = 1e-9;

/// Above this maximum an all-integral batch is taken to be in cents.
const CENTS_MAX_THRESHOLD: f64 = 10_000.0;

/// Above this median an all-integral batch is taken to be in cents.
const CENTS_MEDIAN_THRESHOLD: f64 = 1_000.0;

/// Scale applied to every extracted amount of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Divisor {
    /// Amounts are already in major units.
    #[default]
    Units,
    /// Amounts are in minor units and are divided by 100.
    Cents,
}

impl Divisor {
    /// Numeric divisor.
    #[inline]
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Self::Units => 1.0,
            Self::Cents => 100.0,
        }
    }

    /// Rescales one amount.
    #[inline]
    #[must_use]
    pub fn apply(self, amount: f64) -> f64 {
        amount / self.value()
    }
}

/// Decides the divisor for a batch from its extracted amounts.
///
/// Returns [`Divisor::Cents`] when every amount is integral and either the
/// maximum exceeds 10 000 or the median exceeds 1 000.
#[must_use]
pub fn compute_divisor(candidates: &[f64]) -> Divisor {
    if candidates.is_empty() {
        return Divisor::Units;
    }
    let all_integers = candidates
        .iter()
        .all(|amount| (amount - amount.round()).abs() < INTEGER_TOLERANCE);
    if !all_integers {
        return Divisor::Units;
    }

    let mut sorted = candidates.to_vec();
    sorted.sort_by(f64::total_cmp);
    let max = sorted.last().copied().unwrap_or_default();
    #[allow(clippy::integer_division, reason = "upper median index")]
    let median = sorted.get(sorted.len() / 2).copied().unwrap_or_default();

    let divisor = if max > CENTS_MAX_THRESHOLD || median > CENTS_MEDIAN_THRESHOLD {
        Divisor::Cents
    } else {
        Divisor::Units
    };
    tracing::debug!(
        batch = candidates.len(),
        max,
        median,
        ?divisor,
        "chose amount divisor"
    );
    divisor
}
