use super::dates::completion_month_label;
use super::state::FilterState;
use crate::models::{TaskField, TaskRecord};

/// Fields searched by the free-text query
const SEARCH_FIELDS: [TaskField; 3] = [TaskField::Name, TaskField::TaskId, TaskField::Notes];

/// Apply filters to task records, returning the matching records in input order
///
/// Filter logic:
/// - Every active predicate must match (AND across fields)
/// - Selected statuses are OR'd together
/// - Inactive (empty) predicates match everything
/// - A missing field never satisfies an active predicate
pub fn apply_filters<'a>(records: &'a [TaskRecord], filter: &FilterState) -> Vec<&'a TaskRecord> {
    if filter.is_empty() {
        return records.iter().collect();
    }

    let lower_query = filter.search_query().to_lowercase();
    records.iter().filter(|record| evaluate_filter(record, filter, &lower_query)).collect()
}

/// Evaluate every predicate against a single record
fn evaluate_filter(record: &TaskRecord, filter: &FilterState, lower_query: &str) -> bool {
    match_search(record, lower_query)
        && match_status(record, filter)
        && match_assignee(record, filter.selected_assignee())
        && match_completion_month(record, filter.completion_month())
        && match_completion_date_prefix(record, filter.completion_date_prefix())
}

/// Case-insensitive substring match against name, ID and notes
fn match_search(record: &TaskRecord, lower_query: &str) -> bool {
    if lower_query.is_empty() {
        return true;
    }

    SEARCH_FIELDS
        .iter()
        .filter_map(|field| record.get(*field))
        .any(|value| value.to_lowercase().contains(lower_query))
}

/// Exact status membership
fn match_status(record: &TaskRecord, filter: &FilterState) -> bool {
    let selected = filter.selected_statuses();
    if selected.is_empty() {
        return true;
    }

    record.section.as_deref().is_some_and(|section| selected.contains(section))
}

fn match_assignee(record: &TaskRecord, assignee: &str) -> bool {
    assignee.is_empty() || record.assignee.as_deref() == Some(assignee)
}

/// Completion month label must equal the selected label; unparseable dates never match
fn match_completion_month(record: &TaskRecord, month: &str) -> bool {
    if month.is_empty() {
        return true;
    }

    completion_month_label(record.completed_at.as_deref()).is_some_and(|label| label == month)
}

/// Literal prefix test on the raw completion timestamp
fn match_completion_date_prefix(record: &TaskRecord, prefix: &str) -> bool {
    prefix.is_empty()
        || record.completed_at.as_deref().is_some_and(|completed| completed.starts_with(prefix))
}
