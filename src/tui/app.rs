//! TUI application state and event handling.
//!
//! `App` wraps an [`ExplorerSession`] and translates key presses into session mutations:
//!
//! - **Query input**: `filter_expr | search text`. The search part is applied on every keystroke,
//!   the filter part when Enter is pressed
//! - **Facet panel**: status buckets (multi-select), assignees and completion months
//!   (single-select, selecting the active value clears it)
//! - **Paging**: the results panel shows one page; selection moves within it
//! - **Export**: the full filtered set goes to the clipboard as HTML plus plain text
//! - **Reload**: the source file is re-read on a worker thread while the old data stays visible
//! - **Status messages**: transient feedback for export and reload outcomes
//!
//! # Example
//!
//! ```rust,ignore
//! let session = ExplorerSession::with_records(records, 20);
//! let mut app = App::new(session, Some(path));
//! app.run(&mut terminal)?;
//! ```

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::{debug, info};

use super::events::{Action, poll_event};
use super::rendering::{RenderState, render_ui};
use crate::clipboard::{ClipboardOutcome, ClipboardProvider, SystemClipboard};
use crate::facets::Facets;
use crate::filters::{parse_filter, split_query};
use crate::models::TaskRecord;
use crate::parsers::parse_task_csv;
use crate::session::ExplorerSession;

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 2000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Minimum gap between two filter applications from Enter
const ENTER_DEBOUNCE_MS: u64 = 150;
const MAX_INPUT_LEN: usize = 256;

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

/// Which panel receives Up/Down and Enter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Results,
    Facets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    Status,
    Assignee,
    Month,
}

/// One selectable row of the facet panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetItem {
    pub kind: FacetKind,
    pub value: String,
}

/// Flatten facets into panel rows: statuses, then assignees, then months
fn facet_items(facets: Facets) -> Vec<FacetItem> {
    let rows = |kind: FacetKind, values: Vec<String>| {
        values.into_iter().map(move |value| FacetItem { kind, value })
    };

    rows(FacetKind::Status, facets.statuses)
        .chain(rows(FacetKind::Assignee, facets.assignees))
        .chain(rows(FacetKind::Month, facets.completion_months))
        .collect()
}

pub struct App {
    session: ExplorerSession,
    source: Option<PathBuf>,
    input: String,
    focus: Focus,
    selected_idx: usize,
    facet_items: Vec<FacetItem>,
    facet_idx: usize,
    filter_error: Option<String>,
    last_enter_time: Option<Instant>,
    status_message: Option<StatusMessage>,
    reload_rx: Option<Receiver<Result<Vec<TaskRecord>>>>,
    should_quit: bool,
    // Dirty state tracking for efficient rendering
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    /// `source` is the file Ctrl+R re-reads; `None` disables reloading
    pub fn new(session: ExplorerSession, source: Option<PathBuf>) -> Self {
        let facet_items = facet_items(session.facets());

        Self {
            session,
            source,
            input: String::new(),
            focus: Focus::Results,
            selected_idx: 0,
            facet_items,
            facet_idx: 0,
            filter_error: None,
            last_enter_time: None,
            status_message: None,
            reload_rx: None,
            should_quit: false,
            needs_redraw: true,
            last_draw_time: Instant::now(),
        }
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    fn set_success(&mut self, text: impl Into<String>) {
        self.set_status(text, MessageType::Success, STATUS_SUCCESS_DURATION_MS);
    }

    fn set_error(&mut self, text: impl Into<String>) {
        self.set_status(text, MessageType::Error, STATUS_ERROR_DURATION_MS);
    }

    /// Check and clear expired status messages
    fn check_and_clear_expired_status(&mut self) {
        let should_clear = self
            .status_message
            .as_ref()
            .map(|msg| Instant::now() >= msg.expires_at)
            .unwrap_or(false);
        if should_clear {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            self.check_and_clear_expired_status();
            self.poll_reload();

            // Draw if dirty or if it's been >100ms (for terminal resize handling)
            let now = Instant::now();
            let elapsed = now.duration_since(self.last_draw_time);
            if self.needs_redraw || elapsed >= Duration::from_millis(100) {
                let page_records = self.session.current_page_records();
                terminal.draw(|f| {
                    let state = RenderState {
                        input: &self.input,
                        focus: self.focus,
                        filters: self.session.filters(),
                        facet_items: &self.facet_items,
                        facet_idx: self.facet_idx,
                        page_records: &page_records,
                        selected_idx: self.selected_idx,
                        current_page: self.session.current_page(),
                        total_pages: self.session.total_pages(),
                        filtered_count: self.session.filtered_count(),
                        total_count: self.session.records().len(),
                        filter_error: self.filter_error.as_deref(),
                        load_error: self.session.load_error(),
                        loading: self.session.is_loading(),
                        status_message: self.status_message.as_ref(),
                    };
                    render_ui(f, &state);
                })?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(100))?;
            self.handle_action(action);
        }

        Ok(())
    }

    /// Handle a user action (extracted for testing)
    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::ClearInput => self.clear_input(),
            Action::MoveUp => self.move_selection(-1),
            Action::MoveDown => self.move_selection(1),
            Action::NextPage => {
                if self.session.next_page() {
                    self.selected_idx = 0;
                    self.needs_redraw = true;
                }
            }
            Action::PrevPage => {
                if self.session.prev_page() {
                    self.selected_idx = 0;
                    self.needs_redraw = true;
                }
            }
            Action::Confirm => match self.focus {
                Focus::Facets => self.toggle_facet(),
                Focus::Results => {
                    let should_apply = self
                        .last_enter_time
                        .map(|last| last.elapsed() >= Duration::from_millis(ENTER_DEBOUNCE_MS))
                        .unwrap_or(true);

                    if should_apply {
                        self.apply_filter();
                        self.last_enter_time = Some(Instant::now());
                    }
                }
            },
            Action::Export => self.export(),
            Action::ClearFilters => {
                self.session.clear_filters();
                self.input.clear();
                self.filter_error = None;
                self.selected_idx = 0;
                self.needs_redraw = true;
            }
            Action::Reload => self.start_reload(),
            Action::ToggleFocus => {
                self.focus = match self.focus {
                    Focus::Results => Focus::Facets,
                    Focus::Facets => Focus::Results,
                };
                self.needs_redraw = true;
            }
            Action::UpdateSearch(c) => self.update_search(c),
            Action::DeleteChar => self.delete_char(),
            Action::None => {}
        }
    }

    /// Esc: dismiss a load error banner, else clear the input, else quit
    fn clear_input(&mut self) {
        if self.session.load_error().is_some() {
            self.session.dismiss_load_error();
        } else if self.input.is_empty() {
            self.should_quit = true;
        } else {
            self.input.clear();
            self.filter_error = None;
            self.sync_search();
        }
        self.needs_redraw = true;
    }

    fn move_selection(&mut self, delta: isize) {
        let (idx, total) = match self.focus {
            Focus::Results => {
                let on_page = self.session.current_page_records().len();
                (&mut self.selected_idx, on_page)
            }
            Focus::Facets => (&mut self.facet_idx, self.facet_items.len()),
        };

        if total == 0 {
            *idx = 0;
            return;
        }

        let old_idx = *idx;
        let new_idx = (*idx as isize + delta).max(0) as usize;
        *idx = new_idx.min(total - 1);

        if old_idx != *idx {
            self.needs_redraw = true;
        }
    }

    fn update_search(&mut self, c: char) {
        if self.input.len() < MAX_INPUT_LEN {
            self.input.push(c);
            self.sync_search();
        }
    }

    fn delete_char(&mut self) {
        if self.input.pop().is_some() {
            self.sync_search();
        }
    }

    /// Push the search part of the input into the session
    fn sync_search(&mut self) {
        let (_, search) = split_query(&self.input);
        if search != self.session.filters().search_query() {
            self.session.set_search_query(search);
            self.selected_idx = 0;
        }
        self.needs_redraw = true;
    }

    /// Apply the filter part of the input.
    ///
    /// Without a filter part the current predicates (including facet panel selections) are kept.
    /// A parse error is shown and leaves the filter state untouched.
    fn apply_filter(&mut self) {
        let (filter_part, search) = split_query(&self.input);
        let Some(filter_part) = filter_part else {
            self.filter_error = None;
            self.needs_redraw = true;
            return;
        };

        match parse_filter(filter_part) {
            Ok(mut state) => {
                state.set_search_query(search);
                debug!(active = state.active_count(), "applying typed filter");
                self.session.replace_filters(state);
                self.filter_error = None;
                self.selected_idx = 0;
            }
            Err(e) => {
                self.filter_error = Some(format!(
                    "Parse error: {:#} | Try: status:Done assignee:Ann | search",
                    e
                ));
            }
        }
        self.needs_redraw = true;
    }

    /// Toggle the highlighted facet value
    fn toggle_facet(&mut self) {
        let Some(item) = self.facet_items.get(self.facet_idx).cloned() else {
            return;
        };

        match item.kind {
            FacetKind::Status => {
                self.session.toggle_status(&item.value);
            }
            FacetKind::Assignee => {
                let next = if self.session.filters().selected_assignee() == item.value {
                    String::new()
                } else {
                    item.value
                };
                self.session.set_selected_assignee(next);
            }
            FacetKind::Month => {
                let next = if self.session.filters().completion_month() == item.value {
                    String::new()
                } else {
                    item.value
                };
                self.session.set_completion_month(next);
            }
        }
        self.selected_idx = 0;
        self.needs_redraw = true;
    }

    fn export(&mut self) {
        if self.session.filtered_count() == 0 {
            self.set_error("✗ No tasks to export");
            return;
        }

        match SystemClipboard::new() {
            Ok(mut clipboard) => self.export_with(&mut clipboard),
            Err(e) => self.set_error(format!("✗ Clipboard error: {:#}", e)),
        }
    }

    /// Export the filtered set through `provider` and report the outcome
    fn export_with(&mut self, provider: &mut dyn ClipboardProvider) {
        let count = self.session.filtered_count();
        match self.session.export_to(provider) {
            Ok(ClipboardOutcome::RichText) => {
                self.set_success(format!("✓ Copied {} tasks to clipboard", count));
            }
            Ok(ClipboardOutcome::PlainTextFallback) => {
                self.set_success(format!("✓ Copied {} tasks to clipboard (plain text only)", count));
            }
            Err(e) => self.set_error(format!("✗ Export failed: {:#}", e)),
        }
    }

    /// Re-read the source file on a worker thread
    fn start_reload(&mut self) {
        if self.session.is_loading() {
            return;
        }
        let Some(path) = self.source.clone() else {
            self.set_error("✗ No source file to reload");
            return;
        };

        let (tx, rx) = mpsc::channel();
        self.session.begin_ingest();
        thread::spawn(move || {
            // The receiver may be gone if the app quit mid-reload
            let _ = tx.send(parse_task_csv(&path));
        });
        self.reload_rx = Some(rx);
        self.needs_redraw = true;
    }

    /// Pick up a finished reload, if any
    fn poll_reload(&mut self) {
        let Some(rx) = &self.reload_rx else {
            return;
        };

        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(anyhow!("Reload worker exited without a result")),
        };
        self.reload_rx = None;
        self.finish_reload(result);
    }

    fn finish_reload(&mut self, result: Result<Vec<TaskRecord>>) {
        if self.session.finish_ingest(result) {
            self.facet_items = facet_items(self.session.facets());
            self.facet_idx = self.facet_idx.min(self.facet_items.len().saturating_sub(1));
            self.selected_idx = 0;
            let count = self.session.records().len();
            info!(records = count, "reloaded task export");
            self.set_success(format!("✓ Reloaded {} tasks", count));
        } else {
            self.set_error("✗ Reload failed, showing previous data");
        }
        self.needs_redraw = true;
    }
}
