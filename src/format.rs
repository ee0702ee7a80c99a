//! Display formatting for amounts, rates and timestamps.

use chrono::{DateTime, Utc};

use crate::timestamp::parse_instant;

/// Formats an amount as US dollars: `$1,234.56`, `-$12.00`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0.00".to_owned();
    }
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let grouped = group_thousands(whole);
    // "-0.00" must not render with a sign
    if amount < 0.0 && fixed != "0.00" {
        format!("-${grouped}.{cents}")
    } else {
        format!("${grouped}.{cents}")
    }
}

/// Inserts `,` between groups of three digits.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len().div_euclid(3));
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

/// Formats a fraction as a percentage with two decimals: `0.0058` becomes
/// `0.58%`.
#[inline]
#[must_use]
pub fn format_percentage(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

/// Formats how long ago `timestamp` was, relative to `now`.
///
/// Uses the largest whole unit: `42s ago`, `5m ago`, `3h ago`, `2d ago`.
/// Returns `None` if the timestamp does not parse.
#[must_use]
pub fn format_relative_time(timestamp: &str, now: DateTime<Utc>) -> Option<String> {
    let instant = parse_instant(timestamp)?;
    let seconds = (now - instant).num_milliseconds().div_euclid(1000);
    let text = if seconds < 60 {
        format!("{seconds}s ago")
    } else if seconds < 3_600 {
        format!("{}m ago", seconds.div_euclid(60))
    } else if seconds < 86_400 {
        format!("{}h ago", seconds.div_euclid(3_600))
    } else {
        format!("{}d ago", seconds.div_euclid(86_400))
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_and_rounds() {
        assert_eq!(format_currency(1234.56), "$1,234.56");
        assert_eq!(format_currency(2_456_789.5), "$2,456,789.50");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(100.0), "$100.00");
    }

    #[test]
    fn currency_negative() {
        assert_eq!(format_currency(-12.0), "-$12.00");
        assert_eq!(format_currency(-0.001), "$0.00");
        assert_eq!(format_currency(f64::NAN), "$0.00");
    }

    #[test]
    fn percentage() {
        assert_eq!(format_percentage(0.0058), "0.58%");
        assert_eq!(format_percentage(0.9956), "99.56%");
        assert_eq!(format_percentage(0.0), "0.00%");
    }

    #[test]
    fn relative_time_units() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let at = |seconds: i64| {
            crate::timestamp::to_iso(DateTime::from_timestamp(1_700_000_000 - seconds, 0).unwrap())
        };
        assert_eq!(format_relative_time(&at(42), now).as_deref(), Some("42s ago"));
        assert_eq!(format_relative_time(&at(59 * 60 + 59), now).as_deref(), Some("59m ago"));
        assert_eq!(format_relative_time(&at(3 * 3_600 + 5), now).as_deref(), Some("3h ago"));
        assert_eq!(format_relative_time(&at(2 * 86_400 + 7), now).as_deref(), Some("2d ago"));
    }

    #[test]
    fn relative_time_unparsable() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(format_relative_time("sometime", now), None);
    }
}
