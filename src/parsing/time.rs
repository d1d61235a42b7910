//! Timestamp parsing shared by the extractors.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// Converts epoch seconds (possibly fractional) to a UTC time.
///
/// ChatGPT stores `create_time` as a float such as `1761376400.31522`.
pub fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    let whole = secs.trunc();
    let nanos = ((secs - whole) * 1_000_000_000.0).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

/// Parses an RFC 3339 timestamp such as `2024-05-01T09:00:00.123456Z`.
pub fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Reads a timestamp from a JSON value of either shape.
///
/// Numbers are epoch seconds; numbers above 10^11 are taken as milliseconds.
/// Strings are tried as RFC 3339 first, then as a numeric epoch.
pub fn parse_timestamp_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_f64().and_then(epoch_auto),
        Value::String(s) => parse_rfc3339(s).or_else(|| s.trim().parse::<f64>().ok().and_then(epoch_auto)),
        _ => None,
    }
}

fn epoch_auto(value: f64) -> Option<DateTime<Utc>> {
    if value > 1e11 {
        from_epoch_seconds(value / 1000.0)
    } else {
        from_epoch_seconds(value)
    }
}
