//! Timestamp parsing
//!
//! Alerts and flows carry ISO-8601 text on the wire. Ordering is always done
//! on parsed `DateTime<Utc>` values, never on the strings.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::{EngineError, EngineResult};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse RFC 3339 (`Z` or offset) or naive ISO-8601 (read as UTC)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    // Naive forms, optionally with a trailing `Z`
    let naive = raw.strip_suffix('Z').unwrap_or(raw);
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|ts| ts.and_utc())
}

/// Same as `parse_timestamp` but fails with a located error
pub fn parse_required(raw: &str, context: impl Into<String>) -> EngineResult<DateTime<Utc>> {
    parse_timestamp(raw).ok_or_else(|| EngineError::MalformedTimestamp {
        context: context.into(),
        value: raw.to_string(),
    })
}

/// Wire format: RFC 3339, UTC, microseconds, `Z` suffix
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ============================================================================
// SERDE HELPERS
// ============================================================================

pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(ts))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("malformed timestamp '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parses_rfc3339_and_naive() {
        let a = parse_timestamp("2024-03-01T10:05:00Z").unwrap();
        let b = parse_timestamp("2024-03-01T10:05:00").unwrap();
        let c = parse_timestamp("2024-03-01T10:05:00.123456Z").unwrap();
        let d = parse_timestamp("2024-03-01T12:05:00+02:00").unwrap();

        assert_eq!(a, b);
        assert_eq!(a, d);
        assert_eq!(c.minute(), 5);
        assert!(c > a);
    }

    #[test]
    fn test_chronological_not_lexical() {
        // Lexically "2024-03-01T9..." > "2024-03-01T10...", chronologically it is earlier
        let early = parse_timestamp("2024-03-01 09:59:59").unwrap();
        let late = parse_timestamp("2024-03-01T10:00:00Z").unwrap();
        assert!(early < late);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        let err = parse_required("10/05/2024", "alert ALERT-0001").unwrap_err();
        assert!(matches!(err, EngineError::MalformedTimestamp { .. }));
    }

    #[test]
    fn test_format_roundtrip() {
        let ts = parse_timestamp("2024-03-01T10:05:00.5Z").unwrap();
        let text = format_timestamp(&ts);
        assert_eq!(text, "2024-03-01T10:05:00.500000Z");
        assert_eq!(parse_timestamp(&text), Some(ts));
    }
}
