//! Conversion between stored timestamp values and `DateTime<Utc>`.
//!
//! Documents written by this crate hold RFC 3339 strings, but records
//! imported from other stores carry epoch milliseconds or wrapped
//! timestamp objects (`{"seconds": .., "nanos": ..}` and the
//! underscore-prefixed `{"_seconds": .., "_nanoseconds": ..}` export
//! form). Everything above the store only ever sees `DateTime<Utc>`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Per-backend conversion of timestamp values. The defaults cover the
/// representations above; a backend overrides them only if it stores
/// instants some other way.
pub trait InstantAdapter {
    fn coerce_instant(&self, value: &Value) -> Option<DateTime<Utc>> {
        coerce_instant(value)
    }

    fn encode_instant(&self, instant: DateTime<Utc>) -> Value {
        Value::String(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

/// Turn any supported stored representation into an instant.
/// Unknown shapes yield `None` rather than an error.
pub fn coerce_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_instant(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = map
                .get("nanos")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            DateTime::from_timestamp(seconds, u32::try_from(nanos).ok()?)
        }
        _ => None,
    }
}

/// Parse a user-supplied time string.
///
/// Accepts RFC 3339 with any offset, ISO date-times without an offset
/// (read as UTC), and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_instant(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(ndt.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ndt| ndt.and_utc())
}
