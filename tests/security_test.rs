/// Security-focused integration tests
///
/// These tests verify resource limits and hostile content in task exports
mod common;

use std::fs;
use std::io::Write;

use common::{ExportFileBuilder, TaskBuilder};
use task_export_explorer::utils::terminal::display_cell;
use task_export_explorer::{ExplorerSession, TaskField, parse_task_csv};

#[test]
#[cfg(unix)] // Symlinks work differently on Windows
fn test_security_symlink_to_oversized_export_rejected() {
    let dir = tempfile::TempDir::new().unwrap();
    let target = dir.path().join("huge.csv");
    let file = fs::File::create(&target).unwrap();
    file.set_len(60 * 1024 * 1024).unwrap();

    let link = dir.path().join("tasks.csv");
    std::os::unix::fs::symlink(&target, &link).unwrap();

    // Size is checked on the opened handle, so the link cannot hide the target's size
    let err = parse_task_csv(&link).unwrap_err();
    assert!(format!("{err:#}").contains("File too large"));
}

#[test]
fn test_security_consecutive_malformed_rows_abort() {
    let mut builder = ExportFileBuilder::with_header("Name,Assignee").raw_row("ok,Ann");
    for i in 0..150 {
        builder = builder.raw_row(&format!("bad {i},x,y"));
    }
    let (_dir, path) = builder.build();

    let err = parse_task_csv(&path).unwrap_err();
    assert!(format!("{err:#}").contains("consecutive"));
}

#[test]
fn test_security_invalid_utf8_row_skipped() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("tasks.csv");
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(b"Task ID,Name\n1,First\n2,\xff\xfe broken\n3,Third\n").unwrap();
    file.flush().unwrap();

    let records = parse_task_csv(&path).unwrap();
    let ids: Vec<_> = records.iter().filter_map(|r| r.get(TaskField::TaskId)).collect();
    assert_eq!(ids, vec!["1", "3"]);
}

#[test]
fn test_security_null_bytes_in_cells() {
    let (_dir, path) =
        ExportFileBuilder::new().task(&TaskBuilder::new("T-1", "Test\0null\0byte")).build();

    let records = parse_task_csv(&path).unwrap();
    assert_eq!(records[0].get(TaskField::Name), Some("Test\0null\0byte"));
    assert_eq!(display_cell("Test\0null\0byte"), "Testnullbyte");
}

#[test]
fn test_security_wide_row_with_many_unknown_columns() {
    let header: Vec<String> =
        std::iter::once("Name".to_string()).chain((0..10_000).map(|i| format!("Col{i}"))).collect();
    let row: Vec<String> =
        std::iter::once("Wide".to_string()).chain((0..10_000).map(|i| i.to_string())).collect();

    let (_dir, path) =
        ExportFileBuilder::with_header(&header.join(",")).raw_row(&row.join(",")).build();

    let records = parse_task_csv(&path).unwrap();
    assert_eq!(records[0].get(TaskField::Name), Some("Wide"));
    assert_eq!(records[0].extra.len(), 10_000);
}

#[test]
fn test_security_large_single_cell() {
    let notes = "a".repeat(5 * 1024 * 1024);
    let (_dir, path) =
        ExportFileBuilder::new().task(&TaskBuilder::new("T-1", "Big").notes(&notes)).build();

    let records = parse_task_csv(&path).unwrap();
    let mut session = ExplorerSession::with_records(records, 20);
    session.set_search_query("aaaa");

    assert_eq!(session.filtered_count(), 1);
    assert_eq!(session.current_page_records()[0].notes.as_deref().map(str::len), Some(notes.len()));
}

#[test]
fn test_security_unicode_forms_are_not_normalized() {
    // U+00E9 (é) vs U+0065 U+0301 (e + combining acute)
    let records = vec![
        TaskBuilder::new("1", "caf\u{00E9}").record(),
        TaskBuilder::new("2", "cafe\u{0301}").record(),
    ];
    let mut session = ExplorerSession::with_records(records, 20);

    session.set_search_query("caf\u{00E9}");
    assert_eq!(session.filtered_count(), 1);

    session.set_search_query("caf");
    assert_eq!(session.filtered_count(), 2);
}
