//! Task Export Explorer - Search, filter and export task-tracker CSV exports
//!
//! This library provides the in-memory query engine behind the explorer:
//!
//! - Parsing task exports (one row per task) into typed [`TaskRecord`]s
//! - Deriving facet values (status buckets, assignees, completion months)
//! - Filtering with free-text search and four categorical/date predicates
//! - Paging through the filtered result
//! - Exporting the filtered result as tab-separated text and an HTML table
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use task_export_explorer::{ExplorerSession, parse_task_csv};
//!
//! let records = parse_task_csv(Path::new("tasks.csv"))?;
//! let mut session = ExplorerSession::with_records(records, 20);
//! session.set_search_query("bug");
//! session.set_selected_statuses(["Done", "In Progress"]);
//! println!("{} matching tasks on {} pages", session.filtered_count(), session.total_pages());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod clipboard;
pub mod export;
pub mod facets;
pub mod filters;
pub mod models;
pub mod pagination;
pub mod parsers;
pub mod session;
pub mod store;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use clipboard::{ClipboardOutcome, ClipboardProvider, copy_payload_to_clipboard};
pub use export::{ExportPayload, to_delimited_text, to_markup_table};
pub use facets::Facets;
pub use filters::{FilterState, apply_filters, parse_query};
pub use models::{ColumnDef, TaskField, TaskRecord, VISIBLE_COLUMNS};
pub use pagination::Paginator;
pub use parsers::parse_task_csv;
pub use session::ExplorerSession;
pub use store::RecordStore;
