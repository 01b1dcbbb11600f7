//! Epoch-millisecond timestamps to ISO-8601 UTC.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Format a UTC time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_iso(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Read a JSON number, or a string holding one, as epoch milliseconds.
pub fn parse_epoch_millis(value: &Value) -> Option<DateTime<Utc>> {
    let millis = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !millis.is_finite() {
        return None;
    }
    // Saturating cast; out-of-range values are rejected by chrono.
    DateTime::from_timestamp_millis(millis.floor() as i64)
}

/// Convert a submitted timestamp, substituting `now` when it is unusable.
pub fn iso_or_now(value: &Value, now: DateTime<Utc>) -> String {
    match parse_epoch_millis(value) {
        Some(time) => format_iso(time),
        None => {
            log::warn!("Unusable timestamp {}, using current time", value);
            format_iso(now)
        }
    }
}
