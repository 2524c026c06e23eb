use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord};
use tracing::{info, warn};

use crate::models::TaskRecord;
use crate::utils::validate_file_size;

const MAX_CONSECUTIVE_ERRORS: usize = 100;

/// Parse a task export CSV file into records
///
/// Gracefully handles malformed rows by logging and skipping them.
/// Returns an error if more than 50% of rows fail to parse or >100 consecutive errors
pub fn parse_task_csv(path: &Path) -> Result<Vec<TaskRecord>> {
    // Open file and validate size to avoid TOCTOU race condition
    let file = File::open(path)
        .with_context(|| format!("Failed to open task export: {}", path.display()))?;
    validate_file_size(&file, path)?;

    parse_task_csv_reader(file)
        .with_context(|| format!("Failed to parse task export: {}", path.display()))
}

/// Parse task export CSV from any reader; the first row is the header
pub fn parse_task_csv_reader<R: Read>(reader: R) -> Result<Vec<TaskRecord>> {
    // Field counts are checked per row so whitespace-only lines can be skipped as blank
    let mut csv_reader = ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .context("Failed to read header row")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    if headers.iter().all(String::is_empty) {
        bail!("Header row is empty");
    }

    let mut records = Vec::new();
    let mut skipped_count = 0;
    let mut total_rows = 0;
    let mut consecutive_errors = 0;

    for (row_idx, row) in csv_reader.records().enumerate() {
        let outcome = match row {
            Ok(row) if is_blank(&row) => continue,
            Ok(row) if row.len() != headers.len() => Err(format!(
                "expected {} fields, found {}",
                headers.len(),
                row.len()
            )),
            Ok(row) => Ok(to_task_record(&headers, &row)),
            Err(e) => Err(e.to_string()),
        };
        total_rows += 1;

        match outcome {
            Ok(record) => {
                records.push(record);
                consecutive_errors = 0;
            }
            Err(error) => {
                // +2: one for the header row, one for 1-based numbering
                warn!(row = row_idx + 2, %error, "skipping malformed row");
                skipped_count += 1;
                consecutive_errors += 1;

                if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                    bail!(
                        "Too many consecutive parse errors ({}) in task export - file may be corrupted",
                        consecutive_errors
                    );
                }
            }
        }
    }

    if total_rows > 0 {
        let failure_rate = (skipped_count as f64) / (total_rows as f64);
        if failure_rate > 0.5 {
            bail!(
                "Too many parse failures in task export: {} of {} rows failed ({:.1}%)",
                skipped_count,
                total_rows,
                failure_rate * 100.0
            );
        }
    }

    if skipped_count > 0 {
        warn!(records = records.len(), skipped = skipped_count, "parsed task export with errors");
    } else {
        info!(records = records.len(), "parsed task export");
    }

    Ok(records)
}

fn is_blank(row: &StringRecord) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

fn to_task_record(headers: &[String], row: &StringRecord) -> TaskRecord {
    TaskRecord::from_fields(headers.iter().map(String::as_str).zip(row.iter()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::models::TaskField;

    const HEADER: &str = "Task ID,Name,Section/Column,Assignee,Notes,Created At,Completed At,Tags";

    fn parse(content: &str) -> Result<Vec<TaskRecord>> {
        parse_task_csv_reader(content.as_bytes())
    }

    #[test]
    fn test_parse_valid_export() {
        let content = format!(
            "{HEADER}\n1,Fix bug,Done,Ann,,2024-02-01,2024-03-01,\"backend,urgent\"\n2,Write docs,In Progress,Bob,,2024-02-03,,\n"
        );

        let records = parse(&content).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(TaskField::Name), Some("Fix bug"));
        assert_eq!(records[0].get(TaskField::Tags), Some("backend,urgent"));
        assert_eq!(records[1].get(TaskField::CompletedAt), Some(""));
    }

    #[test]
    fn test_missing_headers_are_absent() {
        let records = parse("Name,Assignee\nFix bug,Ann\n").unwrap();
        assert_eq!(records[0].get(TaskField::Name), Some("Fix bug"));
        assert_eq!(records[0].get(TaskField::CompletedAt), None);
    }

    #[test]
    fn test_unrecognized_headers_preserved() {
        let records = parse("Name,Priority\nFix bug,High\n").unwrap();
        assert_eq!(records[0].extra.get("Priority").map(String::as_str), Some("High"));
    }

    #[test]
    fn test_multiline_quoted_notes() {
        let records = parse("Name,Notes\nFix bug,\"line one\nline two\"\n").unwrap();
        assert_eq!(records[0].get(TaskField::Notes), Some("line one\nline two"));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let records = parse("Name,Assignee\nA,Ann\n\n,\nB,Bob\n").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_whitespace_only_rows_skipped() {
        let records = parse("Name,Assignee\nA,Ann\n   \n\t\nB,Bob\n").unwrap();
        assert_eq!(records.len(), 2);

        assert!(parse("Name,Assignee\n   \n").unwrap().is_empty());
    }

    #[test]
    fn test_short_rows_are_malformed() {
        let records = parse("Name,Assignee,Notes\nA,Ann,x\nB,Bob\nC,Cy,z\n").unwrap();
        let names: Vec<_> = records.iter().filter_map(|r| r.name.as_deref()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_byte_order_mark_stripped() {
        let records = parse("\u{feff}Task ID,Name\n7,Fix bug\n").unwrap();
        assert_eq!(records[0].get(TaskField::TaskId), Some("7"));
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let records = parse("Name,Assignee\nA,Ann\nB,Bob,extra\nC,Cy\n").unwrap();
        let names: Vec<_> = records.iter().filter_map(|r| r.name.as_deref()).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_high_failure_rate_fails() {
        let result = parse("Name,Assignee\nA,Ann\nB,Bob,x\nC,Cy,x\n");
        assert!(result.unwrap_err().to_string().contains("Too many parse failures"));
    }

    #[test]
    fn test_consecutive_errors_fail() {
        let mut content = String::from("Name,Assignee\n");
        for i in 0..150 {
            content.push_str(&format!("ok {i},Ann\n"));
        }
        for _ in 0..MAX_CONSECUTIVE_ERRORS {
            content.push_str("bad,row,extra\n");
        }

        let result = parse(&content);
        assert!(result.unwrap_err().to_string().contains("consecutive"));
    }

    #[test]
    fn test_header_only_yields_no_records() {
        assert!(parse(&format!("{HEADER}\n")).unwrap().is_empty());
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(parse("").is_err());
    }

    #[test]
    fn test_parse_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Name,Section/Column").unwrap();
        writeln!(file, "Fix bug,Done").unwrap();

        let records = parse_task_csv(file.path()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse_task_csv(Path::new("/definitely/not/here.csv"));
        assert!(result.unwrap_err().to_string().contains("Failed to open"));
    }
}
