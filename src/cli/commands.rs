use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use super::logging::{LogTarget, init_tracing};
use crate::clipboard::{ClipboardOutcome, copy_payload_to_clipboard};
use crate::facets::{Facets, status_counts};
use crate::filters::dates::parse_timestamp;
use crate::filters::{FilterState, parse_query, validate_date_prefix};
use crate::models::{ColumnDef, TaskField, TaskRecord, VISIBLE_COLUMNS};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::parsers::parse_task_csv;
use crate::session::ExplorerSession;
use crate::tui::run_interactive;
use crate::tui::timestamps::{format_date_cell, value_or_placeholder};
use crate::utils::terminal::{display_cell, truncate_chars};
use crate::utils::{format_path_with_tilde, resolve_page_size};

/// Widest a cell may get in `list` table output
const MAX_CELL_WIDTH: usize = 40;

#[derive(Parser)]
#[command(name = "task-export-explorer")]
#[command(version)]
#[command(about = "Search, filter and export task-tracker CSV exports", long_about = None)]
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output (-q warn, -qq error)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics about an export
    Stats {
        /// Task export CSV file
        file: PathBuf,
    },
    /// List the status, assignee and completion-month values available for filtering
    Facets {
        /// Task export CSV file
        file: PathBuf,
    },
    /// Print one page of the filtered tasks
    List {
        /// Task export CSV file
        file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Page to show (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Tasks per page (defaults to $TASK_EXPLORER_PAGE_SIZE, then 20)
        #[arg(long)]
        page_size: Option<usize>,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Export every filtered task as tab-separated text or an HTML table
    Export {
        /// Task export CSV file
        file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Format printed to stdout
        #[arg(long, value_enum, default_value_t = ExportFormat::Tsv)]
        format: ExportFormat,

        /// Copy both formats to the clipboard instead of printing
        #[arg(long)]
        clipboard: bool,
    },
    /// Browse an export interactively
    Browse {
        /// Task export CSV file
        file: PathBuf,

        /// Tasks per page (defaults to $TASK_EXPLORER_PAGE_SIZE, then 20)
        #[arg(long)]
        page_size: Option<usize>,

        /// Write logs to this file while the browser is open
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Tsv,
    Html,
}

/// Filter flags shared by `list` and `export`
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Query syntax: `status:Done assignee:Ann month:"March 2024" date:2024-03 | search text`
    #[arg(long)]
    pub query: Option<String>,

    /// Case-insensitive text matched against name, ID and notes
    #[arg(long)]
    pub search: Option<String>,

    /// Status bucket to include (repeatable; statuses are OR'd)
    #[arg(long = "status")]
    pub statuses: Vec<String>,

    /// Exact assignee
    #[arg(long)]
    pub assignee: Option<String>,

    /// Completion month label, e.g. "March 2024"
    #[arg(long)]
    pub month: Option<String>,

    /// Literal prefix of the completion timestamp, e.g. 2024-03
    #[arg(long)]
    pub date: Option<String>,
}

impl FilterArgs {
    /// Build the filter state: the query first, then individual flags on top
    pub fn to_filter_state(&self) -> Result<FilterState> {
        let mut state = match &self.query {
            Some(query) => parse_query(query).context("Invalid --query")?,
            None => FilterState::new(),
        };

        if let Some(search) = &self.search {
            state.set_search_query(search.as_str());
        }
        for status in &self.statuses {
            if !state.selected_statuses().contains(status) {
                state.toggle_status(status);
            }
        }
        if let Some(assignee) = &self.assignee {
            state.set_selected_assignee(assignee.as_str());
        }
        if let Some(month) = &self.month {
            state.set_completion_month(month.as_str());
        }
        if let Some(date) = &self.date {
            validate_date_prefix(date).context("Invalid --date")?;
            state.set_completion_date_prefix(date.as_str());
        }

        Ok(state)
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let log_target = match &cli.command {
        Some(Commands::Browse { log_file: Some(path), .. }) => LogTarget::File(path.clone()),
        Some(Commands::Browse { log_file: None, .. }) => LogTarget::Discard,
        _ => LogTarget::Stderr,
    };
    init_tracing(cli.verbose, cli.quiet, log_target)?;

    match cli.command {
        Some(Commands::Stats { file }) => show_stats(&file)?,
        Some(Commands::Facets { file }) => show_facets(&file)?,
        Some(Commands::List { file, filters, page, page_size, json }) => {
            list_tasks(&file, &filters, page, page_size, json)?;
        }
        Some(Commands::Export { file, filters, format, clipboard }) => {
            export_tasks(&file, &filters, format, clipboard)?;
        }
        Some(Commands::Browse { file, page_size, .. }) => {
            let page_size = resolve_page_size(page_size)?;
            run_interactive(file, page_size)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn load_session(file: &Path, page_size: usize) -> Result<ExplorerSession> {
    let records = parse_task_csv(file)?;
    Ok(ExplorerSession::with_records(records, page_size))
}

fn show_stats(file: &Path) -> Result<()> {
    let records = parse_task_csv(file)?;
    let facets = Facets::from_records(&records);

    let dated = records
        .iter()
        .filter(|r| r.completed_at.as_deref().and_then(parse_timestamp).is_some())
        .count();

    println!("Task Export Statistics");
    println!("======================");
    println!("Total tasks: {}", records.len());
    println!("  With completion date: {}", dated);
    println!("  Without completion date: {}", records.len() - dated);
    println!();

    println!("Status buckets: {}", facets.statuses.len());
    for (status, count) in status_counts(&records) {
        println!("  {}: {}", display_cell(&status), count);
    }
    println!("Assignees: {}", facets.assignees.len());

    if let (Some(newest), Some(oldest)) =
        (facets.completion_months.first(), facets.completion_months.last())
    {
        println!("Newest completion month: {}", newest);
        println!("Oldest completion month: {}", oldest);
    }
    println!();
    println!("File: {}", format_path_with_tilde(file));

    Ok(())
}

fn show_facets(file: &Path) -> Result<()> {
    let records = parse_task_csv(file)?;
    let facets = Facets::from_records(&records);

    print_facet("Statuses", &facets.statuses);
    print_facet("Assignees", &facets.assignees);
    print_facet("Completion months", &facets.completion_months);

    Ok(())
}

fn print_facet(title: &str, values: &[String]) {
    println!("{} ({}):", title, values.len());
    for value in values {
        println!("  {}", display_cell(value));
    }
}

#[derive(Serialize)]
struct ListOutput<'a> {
    page: usize,
    total_pages: usize,
    page_size: usize,
    filtered_count: usize,
    total_count: usize,
    records: Vec<&'a TaskRecord>,
}

fn list_tasks(
    file: &Path,
    filters: &FilterArgs,
    page: usize,
    page_size: Option<usize>,
    json: bool,
) -> Result<()> {
    let page_size = resolve_page_size(page_size)?;
    let mut session = load_session(file, page_size)?;
    session.replace_filters(filters.to_filter_state()?);

    // Out-of-range pages are shown empty rather than clamped
    let filtered = session.filtered();
    let records = crate::pagination::page(&filtered, page, page_size).to_vec();
    let total_pages = session.paginator().total_pages(filtered.len());

    if json {
        let output = ListOutput {
            page,
            total_pages,
            page_size,
            filtered_count: filtered.len(),
            total_count: session.records().len(),
            records,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if filtered.is_empty() {
        println!("No tasks match the current filters.");
    } else {
        print!("{}", render_table(&records, &list_columns()));
    }
    println!(
        "page {} of {} ({} matching of {})",
        page,
        total_pages,
        filtered.len(),
        session.records().len()
    );

    Ok(())
}

/// Visible columns minus the long-form description
fn list_columns() -> Vec<ColumnDef> {
    VISIBLE_COLUMNS.iter().copied().filter(|c| c.field != TaskField::Notes).collect()
}

fn table_cell(record: &TaskRecord, column: &ColumnDef) -> String {
    let text = match column.field {
        TaskField::CreatedAt | TaskField::CompletedAt => format_date_cell(record.get(column.field)),
        field => display_cell(value_or_placeholder(record.get(field))),
    };
    truncate_chars(&text, MAX_CELL_WIDTH)
}

/// Left-aligned plain-text table with a header row
fn render_table(records: &[&TaskRecord], columns: &[ColumnDef]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| columns.iter().map(|column| table_cell(record, column)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            rows.iter()
                .map(|row| row[idx].chars().count())
                .chain(std::iter::once(column.label.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{}{}", cell, " ".repeat(width - cell.chars().count())))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = format_row(columns.iter().map(|c| c.label).collect());
    for row in &rows {
        out.push_str(&format_row(row.iter().map(String::as_str).collect()));
    }
    out
}

fn export_tasks(
    file: &Path,
    filters: &FilterArgs,
    format: ExportFormat,
    clipboard: bool,
) -> Result<()> {
    // Exports cover every filtered task, so no page-size setting is consulted
    let mut session = load_session(file, DEFAULT_PAGE_SIZE)?;
    session.replace_filters(filters.to_filter_state()?);
    let payload = session.export_payload();
    let count = session.filtered_count();

    if clipboard {
        let outcome = copy_payload_to_clipboard(&payload)?;
        info!(rows = count, ?outcome, "exported tasks to clipboard");
        let detail = match outcome {
            ClipboardOutcome::RichText => "rich text + plain text",
            ClipboardOutcome::PlainTextFallback => "plain text only",
        };
        println!("Copied {} tasks to clipboard ({})", count, detail);
        return Ok(());
    }

    match format {
        ExportFormat::Tsv => println!("{}", payload.plain_text),
        ExportFormat::Html => println!("{}", payload.html),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filter_args_flags() {
        let args = FilterArgs {
            search: Some("bug".to_string()),
            statuses: vec!["Done".to_string(), "In Progress".to_string()],
            assignee: Some("Ann".to_string()),
            date: Some("2024-03".to_string()),
            ..Default::default()
        };

        let state = args.to_filter_state().unwrap();
        assert_eq!(state.search_query(), "bug");
        assert_eq!(state.selected_statuses().len(), 2);
        assert_eq!(state.selected_assignee(), "Ann");
        assert_eq!(state.completion_date_prefix(), "2024-03");
        assert_eq!(state.completion_month(), "");
    }

    #[test]
    fn test_filter_args_flags_layer_on_query() {
        let args = FilterArgs {
            query: Some("status:Done assignee:Ann | fix".to_string()),
            statuses: vec!["Done".to_string(), "Blocked".to_string()],
            assignee: Some("Bob".to_string()),
            ..Default::default()
        };

        let state = args.to_filter_state().unwrap();
        assert_eq!(state.search_query(), "fix");
        assert_eq!(state.selected_statuses().len(), 2);
        assert_eq!(state.selected_assignee(), "Bob");
    }

    #[test]
    fn test_filter_args_bad_query() {
        let args = FilterArgs { query: Some("owner:Ann | x".to_string()), ..Default::default() };
        assert!(args.to_filter_state().unwrap_err().to_string().contains("--query"));
    }

    #[test]
    fn test_filter_args_bad_date() {
        for date in ["garbage", "2024-3", "03/2024"] {
            let args = FilterArgs { date: Some(date.to_string()), ..Default::default() };
            let err = args.to_filter_state().unwrap_err();
            assert!(format!("{err:#}").contains("Invalid --date"), "{date}");
        }
    }

    #[test]
    fn test_render_table_alignment() {
        let a = TaskRecord::default().with(TaskField::TaskId, "1").with(TaskField::Name, "Fix bug");
        let b = TaskRecord::default().with(TaskField::TaskId, "22").with(TaskField::Name, "Docs");
        let columns =
            [ColumnDef::new(TaskField::TaskId, "ID"), ColumnDef::new(TaskField::Name, "Task Name")];

        let table = render_table(&[&a, &b], &columns);
        assert_eq!(table, "ID  Task Name\n1   Fix bug\n22  Docs\n");
    }

    #[test]
    fn test_table_cell_placeholders_and_sanitizing() {
        let record = TaskRecord::default()
            .with(TaskField::Name, "\x1b[31mred\x1b[0m\nname")
            .with(TaskField::CompletedAt, "whenever");

        let name = table_cell(&record, &ColumnDef::new(TaskField::Name, "Task Name"));
        let completed = table_cell(&record, &ColumnDef::new(TaskField::CompletedAt, "Completed"));
        assert_eq!(name, "red name");
        assert_eq!(completed, "—");
    }

    #[test]
    fn test_list_columns_skip_description() {
        let labels: Vec<&str> = list_columns().iter().map(|c| c.label).collect();
        assert!(!labels.contains(&"Description"));
        assert_eq!(labels.len(), VISIBLE_COLUMNS.len() - 1);
    }
}
