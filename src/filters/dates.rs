//! Completion-date helpers shared by the facet extractor, the month predicate and display code.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format used for completion-month labels ("March 2024")
const MONTH_LABEL_FORMAT: &str = "%B %Y";

const DATETIME_FORMATS: [&str; 4] =
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Parse an export timestamp into its calendar date.
///
/// The date is taken as written; offsets in RFC 3339 values do not shift the day.
/// Returns `None` for empty or unrecognized input.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }

    DATE_FORMATS.iter().find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// Render the "Month Year" label for a date
pub fn month_label(date: NaiveDate) -> String {
    date.format(MONTH_LABEL_FORMAT).to_string()
}

/// Month label for a raw completion timestamp, if it parses
pub fn completion_month_label(raw: Option<&str>) -> Option<String> {
    raw.and_then(parse_timestamp).map(month_label)
}

/// Parse a "Month Year" label back to the first day of that month
pub fn parse_month_label(label: &str) -> Option<NaiveDate> {
    // chrono needs a day to build a date, so pin the label to the 1st
    NaiveDate::parse_from_str(&format!("1 {label}"), "%d %B %Y").ok()
}
