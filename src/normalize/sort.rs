//! Type-aware, stable ordering of canonical transactions.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use crate::error::FraudShieldError;
use crate::models::CanonicalTransaction;
use crate::timestamp::parse_instant;

/// Column a history table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Transaction identifier, case-insensitive.
    Id,
    /// Amount in major units.
    Amount,
    /// Risk score.
    RiskScore,
    /// Timestamp, compared as an instant.
    Timestamp,
}

impl FromStr for SortField {
    type Err = FraudShieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "amount" => Ok(Self::Amount),
            "risk" | "risk_score" | "risk-score" => Ok(Self::RiskScore),
            "time" | "timestamp" => Ok(Self::Timestamp),
            _ => Err(FraudShieldError::InvalidInput(format!(
                "unknown sort field `{s}`"
            ))),
        }
    }
}

impl fmt::Display for SortField {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Self::Id => "id",
            Self::Amount => "amount",
            Self::RiskScore => "risk_score",
            Self::Timestamp => "timestamp",
        })
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The opposite direction.
    #[inline]
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Orients an ascending comparison.
    #[inline]
    #[must_use]
    pub const fn orient(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Current sort column and direction of a history table.
///
/// Selecting the current field again flips the direction; selecting a
/// different field starts it descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortState {
    /// Active column.
    pub field: SortField,
    /// Active direction.
    pub direction: SortDirection,
}

impl Default for SortState {
    #[inline]
    fn default() -> Self {
        Self {
            field: SortField::Timestamp,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    /// Applies a column selection.
    #[inline]
    pub fn select(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.reversed();
        } else {
            self.field = field;
            self.direction = SortDirection::Descending;
        }
    }

    /// Sorts `records` according to this state.
    #[inline]
    #[must_use]
    pub fn apply(&self, records: &[CanonicalTransaction]) -> Vec<CanonicalTransaction> {
        sort(records, self.field, self.direction)
    }
}

/// Returns `records` ordered by `field` in `direction`.
///
/// The sort is stable in both directions: records with equal keys keep
/// their batch order. Ids compare case-insensitively and timestamps as
/// instants. Unparsable timestamps rank below every valid one, so they
/// lead an ascending sort and trail a descending one.
#[must_use]
pub fn sort(
    records: &[CanonicalTransaction],
    field: SortField,
    direction: SortDirection,
) -> Vec<CanonicalTransaction> {
    match field {
        SortField::Id => sorted_by(records, direction, |record| record.id.to_lowercase(), Ord::cmp),
        SortField::Amount => sorted_by(records, direction, |record| record.amount, f64::total_cmp),
        SortField::RiskScore => {
            sorted_by(records, direction, |record| record.risk_score, f64::total_cmp)
        }
        SortField::Timestamp => sorted_by(
            records,
            direction,
            |record| parse_instant(&record.timestamp).map(|instant| instant.timestamp_millis()),
            Ord::cmp,
        ),
    }
}

/// Stable sort on a key computed once per record.
fn sorted_by<K, F, C>(
    records: &[CanonicalTransaction],
    direction: SortDirection,
    key: F,
    compare: C,
) -> Vec<CanonicalTransaction>
where
    F: Fn(&CanonicalTransaction) -> K,
    C: Fn(&K, &K) -> Ordering,
{
    let mut keyed: Vec<(K, &CanonicalTransaction)> =
        records.iter().map(|record| (key(record), record)).collect();
    keyed.sort_by(|left, right| direction.orient(compare(&left.0, &right.0)));
    keyed.into_iter().map(|(_, record)| record.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn tx(id: &str, amount: f64, risk_score: f64, timestamp: &str) -> CanonicalTransaction {
        CanonicalTransaction {
            id: id.to_owned(),
            timestamp: timestamp.to_owned(),
            amount,
            risk_score,
            confidence: 0.0,
            extra: Map::new(),
        }
    }

    fn ids(records: &[CanonicalTransaction]) -> Vec<&str> {
        records.iter().map(|record| record.id.as_str()).collect()
    }

    #[test]
    fn ascending_amount_is_stable() {
        let records = vec![
            tx("first-five", 5.0, 0.0, ""),
            tx("one", 1.0, 0.0, ""),
            tx("second-five", 5.0, 0.0, ""),
        ];
        let sorted = sort(&records, SortField::Amount, SortDirection::Ascending);
        assert_eq!(ids(&sorted), vec!["one", "first-five", "second-five"]);
        assert_eq!(ids(&records), vec!["first-five", "one", "second-five"]);
    }

    #[test]
    fn descending_keeps_ties_in_batch_order() {
        let records = vec![
            tx("a", 5.0, 0.0, ""),
            tx("b", 9.0, 0.0, ""),
            tx("c", 5.0, 0.0, ""),
        ];
        let sorted = sort(&records, SortField::Amount, SortDirection::Descending);
        assert_eq!(ids(&sorted), vec!["b", "a", "c"]);
    }

    #[test]
    fn ids_compare_case_insensitively() {
        let records = vec![tx("b", 0.0, 0.0, ""), tx("A", 0.0, 0.0, ""), tx("C", 0.0, 0.0, "")];
        let sorted = sort(&records, SortField::Id, SortDirection::Ascending);
        assert_eq!(ids(&sorted), vec!["A", "b", "C"]);
    }

    #[test]
    fn timestamps_compare_as_instants() {
        let records = vec![
            tx("eight-utc", 0.0, 0.0, "2024-01-15T10:00:00+02:00"),
            tx("nine-thirty-utc", 0.0, 0.0, "2024-01-15T09:30:00Z"),
            tx("broken", 0.0, 0.0, "not a date"),
        ];
        let ascending = sort(&records, SortField::Timestamp, SortDirection::Ascending);
        assert_eq!(ids(&ascending), vec!["broken", "eight-utc", "nine-thirty-utc"]);
        let descending = sort(&records, SortField::Timestamp, SortDirection::Descending);
        assert_eq!(ids(&descending), vec!["nine-thirty-utc", "eight-utc", "broken"]);
    }

    #[test]
    fn risk_scores_compare_numerically() {
        let records = vec![tx("a", 0.0, 9.0, ""), tx("b", 0.0, 80.0, ""), tx("c", 0.0, 10.0, "")];
        let sorted = sort(&records, SortField::RiskScore, SortDirection::Descending);
        assert_eq!(ids(&sorted), vec!["b", "c", "a"]);
    }

    #[test]
    fn state_toggles_and_resets() {
        let mut state = SortState::default();
        assert_eq!(state.field, SortField::Timestamp);
        assert_eq!(state.direction, SortDirection::Descending);

        state.select(SortField::Timestamp);
        assert_eq!(state.direction, SortDirection::Ascending);

        state.select(SortField::Amount);
        assert_eq!(state.field, SortField::Amount);
        assert_eq!(state.direction, SortDirection::Descending);

        state.select(SortField::Amount);
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    #[test]
    fn field_parsing() {
        assert_eq!("Amount".parse::<SortField>().unwrap(), SortField::Amount);
        assert_eq!("risk".parse::<SortField>().unwrap(), SortField::RiskScore);
        assert_eq!("time".parse::<SortField>().unwrap(), SortField::Timestamp);
        assert!("merchant".parse::<SortField>().is_err());
    }
}
