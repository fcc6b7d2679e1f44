//! Backend timestamp handling
//!
//! The backend emits ISO-8601 strings, sometimes with an offset and sometimes
//! without. Everything is normalized to local wall-clock time so that grouping
//! by calendar day matches what the user sees.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer};

/// Parse a backend timestamp into local wall-clock time.
///
/// Accepts RFC 3339 (converted to local time), naive ISO date-times (taken as
/// local) and bare `YYYY-MM-DD` dates (local midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Format as a short date, e.g. `Mar 04, 2025`
pub fn format_date(ts: &NaiveDateTime) -> String {
    ts.format("%b %d, %Y").to_string()
}

/// Format as date and time, e.g. `Mar 04, 2025 14:05`
pub fn format_datetime(ts: &NaiveDateTime) -> String {
    ts.format("%b %d, %Y %H:%M").to_string()
}

/// serde adapter for required timestamps
pub mod required {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

/// serde adapter for optional timestamps; unparseable values become `None`
pub mod optional {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_timestamp))
    }
}
