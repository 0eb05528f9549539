//! Timestamp forms accepted on the wire and shown on the dashboard.

use chrono::{DateTime, Datelike, NaiveDateTime, SecondsFormat, Utc};
use thiserror::Error;

/// Naive ISO-8601 layouts, interpreted as UTC. `%.f` also matches an absent
/// fractional part.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("not an ISO-8601 timestamp: {0:?}")]
pub struct TimestampError(pub String);

/// Parse an upload timestamp.
///
/// RFC 3339 values are converted to UTC; naive values (what Python's
/// `datetime.utcnow().isoformat()` produces) are taken to already be UTC.
///
/// The year must have four digits (0000 to 9999) after conversion to UTC.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, TimestampError> {
    let text = text.trim();
    let parsed = match DateTime::parse_from_rfc3339(text) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(_) => NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .map(|naive| naive.and_utc()),
    };
    parsed
        .filter(|ts| (0..=9999).contains(&ts.year()))
        .ok_or_else(|| TimestampError(text.to_owned()))
}

/// Timestamp as sent by the agent.
pub fn format_wire(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Human-readable form used by the dashboard, e.g. `2024-01-01 00:00:00`.
pub fn format_display(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use proptest::prelude::*;

    #[test]
    fn naive_iso_is_utc() {
        let ts = parse_timestamp("2024-01-01T00:00:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(format_display(&ts), "2024-01-01 00:00:00");
    }

    #[test]
    fn python_utcnow_isoformat_is_accepted() {
        let ts = parse_timestamp("2024-05-06T07:08:09.123456").unwrap();
        assert_eq!(ts.nanosecond(), 123_456_000);
        assert!(parse_timestamp("2024-05-06 07:08:09").is_ok());
    }

    #[test]
    fn offsets_are_normalised() {
        let ts = parse_timestamp("2024-01-01T02:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(parse_timestamp("2024-01-01T00:00:00Z").unwrap(), ts);
    }

    #[test]
    fn garbage_is_rejected() {
        for bad in ["", "yesterday", "2024-13-01T00:00:00", "2024-01-01T25:00:00", "1700000000"] {
            assert!(parse_timestamp(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn years_outside_four_digits_are_rejected() {
        for bad in ["+10000-01-01T00:00:00", "-0001-01-01T00:00:00", "0000-01-01T00:30:00+01:00"] {
            assert!(parse_timestamp(bad).is_err(), "{bad:?} should not parse");
        }
        assert!(parse_timestamp("0000-01-01T00:00:00").is_ok());
        assert!(parse_timestamp("9999-12-31T23:59:59.999999").is_ok());
    }

    proptest! {
        #[test]
        fn wire_form_parses_to_the_same_instant(secs in 0i64..4_102_444_800, micros in 0u32..1_000_000) {
            let ts = Utc.timestamp_opt(secs, micros * 1_000).unwrap();
            prop_assert_eq!(parse_timestamp(&format_wire(&ts)).unwrap(), ts);
        }
    }
}
