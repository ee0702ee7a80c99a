//! Lenient timestamp parsing shared by sorting and formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Naive date-time layouts the backend emits (Python `isoformat()`
/// without an offset).
const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a timestamp into an instant.
///
/// Accepts RFC 3339, naive ISO date-times and dates (taken as UTC), and
/// plain numbers (taken as epoch milliseconds). Returns `None` for
/// anything else.
#[must_use]
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(trimmed, layout).ok())
    {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|millis| millis.is_finite())
        .and_then(|millis| {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "sub-millisecond precision is irrelevant for ordering"
            )]
            let whole = millis.trunc() as i64;
            DateTime::from_timestamp_millis(whole)
        })
}

/// Formats an instant the way browsers print `Date.toISOString()`.
#[inline]
#[must_use]
pub fn to_iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_offset() {
        let parsed = parse_instant("2024-01-15T12:30:00+02:00").unwrap();
        assert_eq!(to_iso(parsed), "2024-01-15T10:30:00.000Z");
    }

    #[test]
    fn parses_naive_iso_as_utc() {
        let parsed = parse_instant("2024-01-15T10:30:00.123456").unwrap();
        assert_eq!(to_iso(parsed), "2024-01-15T10:30:00.123Z");
        assert!(parse_instant("2024-01-15 10:30:00").is_some());
    }

    #[test]
    fn parses_bare_date() {
        let parsed = parse_instant("2024-02-01").unwrap();
        assert_eq!(to_iso(parsed), "2024-02-01T00:00:00.000Z");
    }

    #[test]
    fn parses_numbers_as_epoch_millis() {
        let parsed = parse_instant("406").unwrap();
        assert_eq!(parsed.timestamp_millis(), 406);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_instant("").is_none());
        assert!(parse_instant("yesterday").is_none());
        assert!(parse_instant("inf").is_none());
    }
}
