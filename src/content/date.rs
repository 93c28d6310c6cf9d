//! Timestamp parsing and formatting for content items

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parse a content timestamp.
///
/// Accepts RFC 3339 (`2024-01-01T00:00:00Z`), a naive `YYYY-MM-DDTHH:MM:SS`
/// (taken as UTC) and a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Format a date in long form, e.g. "January 5, 2024"
pub fn long_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Format a date for RSS `pubDate`
pub fn rfc2822(date: &DateTime<Utc>) -> String {
    date.to_rfc2822()
}
