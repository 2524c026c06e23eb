use crate::filters::dates::parse_timestamp;

/// Shown in place of missing values and unparseable dates
pub const PLACEHOLDER: &str = "—";

/// Format a raw export timestamp for display: "Mar 1, 2024"
///
/// Missing, blank and unrecognized values render as [`PLACEHOLDER`].
pub fn format_date_cell(raw: Option<&str>) -> String {
    raw.and_then(parse_timestamp)
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// The value itself, or [`PLACEHOLDER`] when missing or blank
pub fn value_or_placeholder(raw: Option<&str>) -> &str {
    match raw {
        Some(value) if !value.trim().is_empty() => value,
        _ => PLACEHOLDER,
    }
}
