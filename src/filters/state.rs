use std::collections::BTreeSet;

/// The five independent predicate inputs.
///
/// An empty field (or empty status set) is inactive and imposes no constraint. Fields are only
/// changed through the mutation methods so owners can observe every change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    search_query: String,
    selected_statuses: BTreeSet<String>,
    selected_assignee: String,
    completion_month: String,
    completion_date_prefix: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn selected_statuses(&self) -> &BTreeSet<String> {
        &self.selected_statuses
    }

    pub fn selected_assignee(&self) -> &str {
        &self.selected_assignee
    }

    pub fn completion_month(&self) -> &str {
        &self.completion_month
    }

    pub fn completion_date_prefix(&self) -> &str {
        &self.completion_date_prefix
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn set_selected_statuses<I, S>(&mut self, statuses: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_statuses = statuses.into_iter().map(Into::into).collect();
    }

    /// Add the status if missing, remove it if present. Returns whether it is now selected.
    pub fn toggle_status(&mut self, status: &str) -> bool {
        if self.selected_statuses.remove(status) {
            false
        } else {
            self.selected_statuses.insert(status.to_string());
            true
        }
    }

    pub fn set_selected_assignee(&mut self, assignee: impl Into<String>) {
        self.selected_assignee = assignee.into();
    }

    pub fn set_completion_month(&mut self, month: impl Into<String>) {
        self.completion_month = month.into();
    }

    pub fn set_completion_date_prefix(&mut self, prefix: impl Into<String>) {
        self.completion_date_prefix = prefix.into();
    }

    /// Reset every predicate to inactive
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when no predicate is active
    pub fn is_empty(&self) -> bool {
        self.search_query.is_empty()
            && self.selected_statuses.is_empty()
            && self.selected_assignee.is_empty()
            && self.completion_month.is_empty()
            && self.completion_date_prefix.is_empty()
    }

    /// Number of active predicates (status counts once however many values are selected)
    pub fn active_count(&self) -> usize {
        [
            !self.search_query.is_empty(),
            !self.selected_statuses.is_empty(),
            !self.selected_assignee.is_empty(),
            !self.completion_month.is_empty(),
            !self.completion_date_prefix.is_empty(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}
