//! Timestamp helpers
//!
//! Record timestamps are fractional seconds since the Unix epoch.

use chrono::{DateTime, SecondsFormat, Utc};

/// Current wall-clock time in fractional seconds
pub fn now_seconds() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Render a timestamp as ISO-8601 (RFC 3339, UTC, microsecond precision)
///
/// Timestamps outside chrono's representable range fall back to the raw
/// number of seconds.
pub fn to_iso8601(timestamp: f64) -> String {
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1_000_000_000.0).round() as u32;
    DateTime::<Utc>::from_timestamp(secs as i64, nanos.min(999_999_999))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Micros, true))
        .unwrap_or_else(|| format!("{timestamp}s"))
}
