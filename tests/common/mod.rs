//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use task_export_explorer::{TaskField, TaskRecord};
use tempfile::TempDir;

pub const FULL_HEADER: &str =
    "Task ID,Name,Section/Column,Assignee,Notes,Created At,Completed At,Tags";

/// Builder for task export CSV files in a temp directory
pub struct ExportFileBuilder {
    temp_dir: TempDir,
    header: String,
    rows: Vec<String>,
}

impl ExportFileBuilder {
    /// Create a builder using the full eight-column header
    pub fn new() -> Self {
        Self::with_header(FULL_HEADER)
    }

    pub fn with_header(header: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir, header: header.to_string(), rows: Vec::new() }
    }

    /// Append a raw CSV line (caller handles quoting)
    pub fn raw_row(mut self, line: &str) -> Self {
        self.rows.push(line.to_string());
        self
    }

    /// Append a row for the full header, quoting every cell
    pub fn task(mut self, task: &TaskBuilder) -> Self {
        self.rows.push(task.to_csv_line());
        self
    }

    pub fn tasks(mut self, tasks: &[TaskBuilder]) -> Self {
        self.rows.extend(tasks.iter().map(TaskBuilder::to_csv_line));
        self
    }

    /// Write `tasks.csv` and return the directory guard with the file path
    pub fn build(self) -> (TempDir, PathBuf) {
        let path = self.temp_dir.path().join("tasks.csv");
        let mut content = self.header;
        content.push('\n');
        for row in &self.rows {
            content.push_str(row);
            content.push('\n');
        }
        fs::write(&path, content).expect("Failed to write tasks.csv");
        (self.temp_dir, path)
    }
}

impl Default for ExportFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a single task row / record
#[derive(Clone, Default)]
pub struct TaskBuilder {
    values: [String; 8],
}

impl TaskBuilder {
    pub fn new(id: &str, name: &str) -> Self {
        Self::default().set(TaskField::TaskId, id).set(TaskField::Name, name)
    }

    pub fn set(mut self, field: TaskField, value: &str) -> Self {
        let idx = TaskField::ALL.iter().position(|f| *f == field).expect("known field");
        self.values[idx] = value.to_string();
        self
    }

    pub fn status(self, status: &str) -> Self {
        self.set(TaskField::Section, status)
    }

    pub fn assignee(self, assignee: &str) -> Self {
        self.set(TaskField::Assignee, assignee)
    }

    pub fn notes(self, notes: &str) -> Self {
        self.set(TaskField::Notes, notes)
    }

    pub fn completed(self, completed_at: &str) -> Self {
        self.set(TaskField::CompletedAt, completed_at)
    }

    fn to_csv_line(&self) -> String {
        self.values
            .iter()
            .map(|v| format!("\"{}\"", v.replace('"', "\"\"")))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// The record this row parses into
    pub fn record(&self) -> TaskRecord {
        TaskRecord::from_fields(
            TaskField::ALL.iter().map(|f| f.header()).zip(self.values.iter().map(String::as_str)),
        )
    }
}

/// A small, varied data set used across test files
pub fn sample_tasks() -> Vec<TaskBuilder> {
    vec![
        TaskBuilder::new("T-1", "Fix login bug").status("Done").assignee("Ann").completed("2024-03-01"),
        TaskBuilder::new("T-2", "Write API docs")
            .status("In Progress")
            .assignee("Bob")
            .notes("Covers the bug tracker endpoints"),
        TaskBuilder::new("T-3", "Fix signup bug").status("Done").assignee("Bob").completed("2024-02-10"),
        TaskBuilder::new("T-4", "Plan sprint").status("Backlog").assignee("Ann"),
        TaskBuilder::new("T-5", "Release 1.2")
            .status("Done")
            .assignee("Cy")
            .completed("2024-03-20T16:45:00Z"),
        TaskBuilder::new("T-6", "Triage inbox").status("Backlog"),
    ]
}

pub fn sample_records() -> Vec<TaskRecord> {
    sample_tasks().iter().map(TaskBuilder::record).collect()
}

/// `count` generated records cycling through statuses, assignees and months
pub fn generated_records(count: usize) -> Vec<TaskRecord> {
    const STATUSES: [&str; 3] = ["Backlog", "In Progress", "Done"];
    const ASSIGNEES: [&str; 4] = ["Ann", "Bob", "Cy", ""];

    (0..count)
        .map(|i| {
            let completed =
                if i % 3 == 2 { format!("2024-{:02}-{:02}", i % 12 + 1, i % 28 + 1) } else { String::new() };
            TaskBuilder::new(&format!("T-{i}"), &format!("Task number {i}"))
                .status(STATUSES[i % STATUSES.len()])
                .assignee(ASSIGNEES[i % ASSIGNEES.len()])
                .completed(&completed)
                .record()
        })
        .collect()
}
