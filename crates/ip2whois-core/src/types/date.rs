use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Timestamp layouts seen in WHOIS aggregator output besides RFC 3339
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S UTC",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y.%m.%d %H:%M:%S",
];

/// Normalize a provider date to ISO 8601.
///
/// Timestamps become RFC 3339 in UTC with second precision, date-only values
/// become `YYYY-MM-DD`. Anything else is returned unchanged; blank input is
/// treated as absent.
#[must_use]
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(to_iso(dt.with_timezone(&Utc)));
    }

    // e.g. "2024-01-02T03:04:05+0000"
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(to_iso(dt.with_timezone(&Utc)));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(to_iso(naive.and_utc()));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.format("%Y-%m-%d").to_string());
    }

    Some(raw.to_string())
}

/// [`normalize_date`] over an optional value
#[must_use]
pub fn normalize_opt_date(raw: Option<&str>) -> Option<String> {
    raw.and_then(normalize_date)
}

fn to_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}
