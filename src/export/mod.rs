//! Export formatting for the filtered task set.
//!
//! Two renderings are produced from the same rows: tab-separated text for plain-text targets and
//! an HTML table fragment for rich-text targets (spreadsheets, docs, mail). Exports always cover
//! every filtered record, never just the visible page.

use crate::models::{ColumnDef, TaskRecord};

/// Inline style applied to every header and body cell
const CELL_STYLE: &str = "border: 1px solid #ccc; padding: 4px;";
const TABLE_STYLE: &str = "border-collapse: collapse;";

/// Both clipboard renderings of one export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub plain_text: String,
    pub html: String,
}

impl ExportPayload {
    pub fn build(records: &[&TaskRecord], columns: &[ColumnDef]) -> Self {
        Self {
            plain_text: to_delimited_text(records, columns),
            html: to_markup_table(records, columns),
        }
    }
}

fn cell_value<'a>(record: &'a TaskRecord, column: &ColumnDef) -> &'a str {
    record.get(column.field).unwrap_or("")
}

/// Replace `\r\n`, `\n` and `\r` with `replacement`
fn replace_newlines(value: &str, replacement: &str) -> String {
    value.replace("\r\n", "\n").replace(['\n', '\r'], replacement)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Tab-separated text: a header row of column labels, then one row per record
///
/// Missing values become empty cells and embedded newlines become a single space.
pub fn to_delimited_text(records: &[&TaskRecord], columns: &[ColumnDef]) -> String {
    let header = columns.iter().map(|c| c.label).collect::<Vec<_>>().join("\t");

    let body = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| replace_newlines(cell_value(record, column), " "))
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{header}\n{body}")
}

/// HTML table fragment with styled header and body cells
///
/// Missing values become empty cells and embedded newlines become `<br>`.
pub fn to_markup_table(records: &[&TaskRecord], columns: &[ColumnDef]) -> String {
    let mut html = format!("<table style=\"{TABLE_STYLE}\"><thead><tr>");
    for column in columns {
        html.push_str(&format!(
            "<th style=\"{CELL_STYLE}\">{}</th>",
            escape_html(column.label)
        ));
    }
    html.push_str("</tr></thead><tbody>");

    for record in records {
        html.push_str("<tr>");
        for column in columns {
            let value = replace_newlines(&escape_html(cell_value(record, column)), "<br>");
            html.push_str(&format!("<td style=\"{CELL_STYLE}\">{value}</td>"));
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    html
}
