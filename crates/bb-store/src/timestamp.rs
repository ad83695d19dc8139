//! Timestamp text format shared by the store and the file mirror

use chrono::{DateTime, SecondsFormat, Utc};

/// Render as RFC3339 UTC with nanosecond precision.
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse an RFC3339 timestamp, with or without fractional seconds.
pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_keeps_nanoseconds() {
        let ts = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        assert_eq!(format(&ts), "2023-11-14T22:13:20.123456789Z");
        assert_eq!(parse(&format(&ts)), Some(ts));
    }

    #[test]
    fn parse_accepts_whole_seconds_and_offsets() {
        let a = parse("2024-01-01T10:00:00Z").unwrap();
        let b = parse("2024-01-01T12:00:00+02:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse("yesterday").is_none());
    }
}
