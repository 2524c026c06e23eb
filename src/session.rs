//! Explorer session: the state object behind every front end.
//!
//! Owns the record store, the filter state and the page cursor, and exposes mutation methods so
//! that the invariants hold no matter which UI drives it:
//!
//! - Every filter mutation puts the cursor back on page 1 before anything else is computed
//! - Facets, the filtered result and the current page are derived on demand, never stored
//! - A failed ingestion keeps the previously loaded records and surfaces the error
//! - Exporting reads state only

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::clipboard::{ClipboardOutcome, ClipboardProvider, write_payload};
use crate::export::ExportPayload;
use crate::facets::Facets;
use crate::filters::{FilterState, apply_filters};
use crate::models::{TaskRecord, VISIBLE_COLUMNS};
use crate::pagination::Paginator;
use crate::store::RecordStore;

#[derive(Debug, Clone, Default)]
pub struct ExplorerSession {
    store: RecordStore,
    filters: FilterState,
    paginator: Paginator,
    loading: bool,
    load_error: Option<String>,
}

impl ExplorerSession {
    pub fn new(page_size: usize) -> Self {
        Self { paginator: Paginator::new(page_size), ..Self::default() }
    }

    pub fn with_records(records: Vec<TaskRecord>, page_size: usize) -> Self {
        let mut session = Self::new(page_size);
        session.load(records);
        session
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn records(&self) -> &[TaskRecord] {
        self.store.records()
    }

    /// Replace the loaded records and return to page 1. Filters are kept.
    pub fn load(&mut self, records: Vec<TaskRecord>) {
        info!(records = records.len(), "loaded task records");
        self.store.load(records);
        self.paginator.reset();
    }

    /// Mark an ingestion as in flight; the current records stay visible meanwhile
    pub fn begin_ingest(&mut self) {
        self.loading = true;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Complete an ingestion. On failure the previous records are retained and the error is kept
    /// for display. Returns whether the store was replaced.
    pub fn finish_ingest(&mut self, result: Result<Vec<TaskRecord>>) -> bool {
        self.loading = false;
        match result {
            Ok(records) => {
                self.load_error = None;
                self.load(records);
                true
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "ingestion failed, keeping previous records");
                self.load_error = Some(format!("{err:#}"));
                false
            }
        }
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn dismiss_load_error(&mut self) {
        self.load_error = None;
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Apply a change to the filter state, then reset the cursor
    fn mutate_filters(&mut self, change: impl FnOnce(&mut FilterState)) {
        change(&mut self.filters);
        self.paginator.reset();
        debug!(active = self.filters.active_count(), "filter state changed");
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        self.mutate_filters(|f| f.set_search_query(query));
    }

    pub fn set_selected_statuses<I, S>(&mut self, statuses: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mutate_filters(|f| f.set_selected_statuses(statuses));
    }

    /// Toggle one status bucket. Returns whether it is now selected.
    pub fn toggle_status(&mut self, status: &str) -> bool {
        let mut selected = false;
        self.mutate_filters(|f| selected = f.toggle_status(status));
        selected
    }

    pub fn set_selected_assignee(&mut self, assignee: impl Into<String>) {
        let assignee = assignee.into();
        self.mutate_filters(|f| f.set_selected_assignee(assignee));
    }

    pub fn set_completion_month(&mut self, month: impl Into<String>) {
        let month = month.into();
        self.mutate_filters(|f| f.set_completion_month(month));
    }

    pub fn set_completion_date_prefix(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        self.mutate_filters(|f| f.set_completion_date_prefix(prefix));
    }

    /// Adopt a whole new filter state (e.g. from a parsed query)
    pub fn replace_filters(&mut self, filters: FilterState) {
        self.mutate_filters(|f| *f = filters);
    }

    /// Reset all five predicates to inactive and return to page 1
    pub fn clear_filters(&mut self) {
        self.mutate_filters(FilterState::clear);
    }

    pub fn facets(&self) -> Facets {
        Facets::from_records(self.store.records())
    }

    /// Records matching the active filters, in load order
    pub fn filtered(&self) -> Vec<&TaskRecord> {
        apply_filters(self.store.records(), &self.filters)
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn current_page(&self) -> usize {
        self.paginator.current_page()
    }

    pub fn page_size(&self) -> usize {
        self.paginator.page_size()
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.filtered_count())
    }

    /// Records on the current page
    pub fn current_page_records(&self) -> Vec<&TaskRecord> {
        let filtered = self.filtered();
        self.paginator.page(&filtered).to_vec()
    }

    pub fn next_page(&mut self) -> bool {
        let count = self.filtered_count();
        self.paginator.next_page(count)
    }

    pub fn prev_page(&mut self) -> bool {
        self.paginator.prev_page()
    }

    pub fn go_to_page(&mut self, page_number: usize) {
        let count = self.filtered_count();
        self.paginator.go_to(page_number, count);
    }

    /// Both renderings of the full filtered set, in the visible-column schema
    pub fn export_payload(&self) -> ExportPayload {
        ExportPayload::build(&self.filtered(), &VISIBLE_COLUMNS)
    }

    /// Write the full filtered set to a clipboard
    pub fn export_to(&self, provider: &mut dyn ClipboardProvider) -> Result<ClipboardOutcome> {
        let payload = self.export_payload();
        let outcome = write_payload(&payload, provider)?;
        info!(rows = self.filtered_count(), ?outcome, "exported filtered tasks");
        Ok(outcome)
    }
}
