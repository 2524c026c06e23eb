//! Facet extraction: the distinct values offered by the filter controls.
//!
//! Every function here is a pure derivation of the records passed in, so callers can recompute
//! facets eagerly after each load or lazily on demand.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::filters::dates::{month_label, parse_month_label, parse_timestamp};
use crate::models::{TaskField, TaskRecord};

/// Facet values derived from one record set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub statuses: Vec<String>,
    pub assignees: Vec<String>,
    pub completion_months: Vec<String>,
}

impl Facets {
    pub fn from_records(records: &[TaskRecord]) -> Self {
        Self {
            statuses: status_buckets(records),
            assignees: assignees(records),
            completion_months: completion_months(records),
        }
    }
}

/// Distinct non-empty values of `field`, ascending
fn distinct_values(records: &[TaskRecord], field: TaskField) -> Vec<String> {
    let values: BTreeSet<&str> =
        records.iter().filter_map(|r| r.get(field)).filter(|v| !v.is_empty()).collect();
    values.into_iter().map(str::to_string).collect()
}

/// Distinct status buckets, ascending
pub fn status_buckets(records: &[TaskRecord]) -> Vec<String> {
    distinct_values(records, TaskField::Section)
}

/// Distinct assignees, ascending
pub fn assignees(records: &[TaskRecord]) -> Vec<String> {
    distinct_values(records, TaskField::Assignee)
}

/// Distinct completion-month labels, most recent month first.
///
/// Records with a missing or unparseable completion timestamp contribute nothing.
pub fn completion_months(records: &[TaskRecord]) -> Vec<String> {
    let labels: BTreeSet<String> = records
        .iter()
        .filter_map(|r| r.completed_at.as_deref())
        .filter_map(parse_timestamp)
        .map(month_label)
        .collect();

    // Order by the month each label stands for, newest first
    let mut dated: Vec<(NaiveDate, String)> = labels
        .into_iter()
        .filter_map(|label| parse_month_label(&label).map(|date| (date, label)))
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.into_iter().map(|(_, label)| label).collect()
}

/// Record count per status bucket, keyed by bucket name
pub fn status_counts(records: &[TaskRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for section in records.iter().filter_map(|r| r.section.as_deref()).filter(|s| !s.is_empty()) {
        *counts.entry(section.to_string()).or_insert(0) += 1;
    }
    counts
}
