//! CSV ingestion for task exports
//!
//! # Error Handling Strategy
//!
//! This module follows a **graceful degradation** approach suitable for CLI tools:
//!
//! - **Individual row failures**: Malformed rows (wrong column count, bad UTF-8) are logged with
//!   `tracing::warn!` and skipped, so one bad row does not block the whole export.
//!
//! - **Catastrophic failure detection**: If >50% of rows fail to parse, or if >100 consecutive
//!   errors occur, the parser returns an error. This prevents accepting badly corrupted files.
//!
//! - **Blank rows**: Rows with no content are dropped silently and do not count as failures.
//!
//! A returned error is an ingestion failure: callers keep whatever they had loaded before
//! (see [`crate::session::ExplorerSession::finish_ingest`]).

pub mod task_csv;

pub use task_csv::{parse_task_csv, parse_task_csv_reader};
