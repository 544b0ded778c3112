//! Free-form timestamp parsing into canonical UTC instants.
//!
//! Order feeds mix 12-hour clocks with `a.m.`/`P.M.` markers, ISO-8601 with
//! and without fractional seconds, day-first dotted dates, and stray `;`/`,`
//! field separators. Parsing normalizes the markers, then walks a fixed,
//! ordered format chain where the first success wins; a permissive fallback
//! chain handles anything the primary formats miss. Naive results are assumed
//! UTC, offset-aware results are converted.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const MERIDIEM_REWRITES: &[(&str, &str)] = &[
    ("A.M.", "AM"),
    ("P.M.", "PM"),
    ("a.m.", "AM"),
    ("p.m.", "PM"),
    ("am", "AM"),
    ("pm", "PM"),
];

// Specific before general: the fractional-second ISO pattern must precede the
// plain one, and the two 12-hour layouts must precede everything that could
// half-consume them.
const PRIMARY_FORMATS: &[&str] = &[
    "%m/%d/%y %I:%M:%S %p",
    "%I:%M:%S %p %Y-%m-%d",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
];

const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
];

const FALLBACK_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Rewrites meridiem markers to uppercase `AM`/`PM` and turns `;`/`,` field
/// separators into spaces.
pub fn normalize_timestamp(raw: &str) -> String {
    let mut value = raw.trim().to_string();
    for (from, to) in MERIDIEM_REWRITES {
        value = value.replace(from, to);
    }
    value.replace([';', ','], " ")
}

/// Parses a free-form timestamp string into a UTC instant.
///
/// Returns `None` when the input is absent or no pattern in either chain
/// recognizes it; parsing never fails.
pub fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let normalized = normalize_timestamp(raw?);
    if normalized.is_empty() {
        return None;
    }
    for fmt in PRIMARY_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Some(parsed.and_utc());
        }
    }
    parse_lenient(&normalized)
}

fn parse_lenient(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for fmt in FALLBACK_DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(parsed.and_utc());
        }
    }
    for fmt in FALLBACK_DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return parsed.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }
    None
}
