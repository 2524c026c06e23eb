use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Recognized columns of a task export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskField {
    TaskId,
    Name,
    Section,
    Assignee,
    Notes,
    CreatedAt,
    CompletedAt,
    Tags,
}

impl TaskField {
    pub const ALL: [TaskField; 8] = [
        TaskField::TaskId,
        TaskField::Name,
        TaskField::Section,
        TaskField::Assignee,
        TaskField::Notes,
        TaskField::CreatedAt,
        TaskField::CompletedAt,
        TaskField::Tags,
    ];

    /// Header name used by the export file for this field
    pub fn header(self) -> &'static str {
        match self {
            TaskField::TaskId => "Task ID",
            TaskField::Name => "Name",
            TaskField::Section => "Section/Column",
            TaskField::Assignee => "Assignee",
            TaskField::Notes => "Notes",
            TaskField::CreatedAt => "Created At",
            TaskField::CompletedAt => "Completed At",
            TaskField::Tags => "Tags",
        }
    }

    /// Look up a field by its exact header name
    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.header() == header)
    }
}

/// One task row from an export.
///
/// A field is `None` when its header was missing from the source and `Some("")` when the header
/// was present but the cell was blank. Headers the explorer does not use are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRecord {
    pub task_id: Option<String>,
    pub name: Option<String>,
    pub section: Option<String>,
    pub assignee: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
    pub completed_at: Option<String>,
    pub tags: Option<String>,
    pub extra: BTreeMap<String, String>,
}

impl TaskRecord {
    /// Build a record from `(header, value)` pairs in source order
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut record = Self::default();
        for (header, value) in fields {
            match TaskField::from_header(header) {
                Some(field) => *record.slot_mut(field) = Some(value.to_string()),
                None => {
                    record.extra.insert(header.to_string(), value.to_string());
                }
            }
        }
        record
    }

    pub fn get(&self, field: TaskField) -> Option<&str> {
        match field {
            TaskField::TaskId => self.task_id.as_deref(),
            TaskField::Name => self.name.as_deref(),
            TaskField::Section => self.section.as_deref(),
            TaskField::Assignee => self.assignee.as_deref(),
            TaskField::Notes => self.notes.as_deref(),
            TaskField::CreatedAt => self.created_at.as_deref(),
            TaskField::CompletedAt => self.completed_at.as_deref(),
            TaskField::Tags => self.tags.as_deref(),
        }
    }

    /// Builder-style setter, mostly useful for fixtures
    pub fn with(mut self, field: TaskField, value: impl Into<String>) -> Self {
        *self.slot_mut(field) = Some(value.into());
        self
    }

    /// Individual tags from the comma-joined `Tags` cell
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|tags| tags.split(',').map(str::trim).filter(|t| !t.is_empty()).collect())
            .unwrap_or_default()
    }

    fn slot_mut(&mut self, field: TaskField) -> &mut Option<String> {
        match field {
            TaskField::TaskId => &mut self.task_id,
            TaskField::Name => &mut self.name,
            TaskField::Section => &mut self.section,
            TaskField::Assignee => &mut self.assignee,
            TaskField::Notes => &mut self.notes,
            TaskField::CreatedAt => &mut self.created_at,
            TaskField::CompletedAt => &mut self.completed_at,
            TaskField::Tags => &mut self.tags,
        }
    }
}

// Serialized with the export's own header names so JSON output lines up with the source file.
impl Serialize for TaskRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for field in TaskField::ALL {
            if let Some(value) = self.get(field) {
                map.serialize_entry(field.header(), value)?;
            }
        }
        for (header, value) in &self.extra {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fields_maps_recognized_headers() {
        let record = TaskRecord::from_fields([
            ("Task ID", "42"),
            ("Name", "Fix bug"),
            ("Section/Column", "Done"),
            ("Completed At", ""),
        ]);

        assert_eq!(record.get(TaskField::TaskId), Some("42"));
        assert_eq!(record.get(TaskField::Name), Some("Fix bug"));
        assert_eq!(record.get(TaskField::Section), Some("Done"));
        assert_eq!(record.get(TaskField::CompletedAt), Some(""));
        assert_eq!(record.get(TaskField::Assignee), None);
    }

    #[test]
    fn test_from_fields_keeps_unrecognized_headers() {
        let record = TaskRecord::from_fields([("Name", "Task"), ("Priority", "High")]);

        assert_eq!(record.extra.get("Priority").map(String::as_str), Some("High"));
        assert_eq!(record.get(TaskField::Name), Some("Task"));
    }

    #[test]
    fn test_empty_source_yields_empty_record() {
        let record = TaskRecord::from_fields(std::iter::empty());
        assert_eq!(record, TaskRecord::default());
    }

    #[test]
    fn test_header_round_trip() {
        for field in TaskField::ALL {
            assert_eq!(TaskField::from_header(field.header()), Some(field));
        }
        assert_eq!(TaskField::from_header("name"), None);
    }

    #[test]
    fn test_tag_list_splits_and_trims() {
        let record = TaskRecord::default().with(TaskField::Tags, "backend, urgent,,ops ");
        assert_eq!(record.tag_list(), vec!["backend", "urgent", "ops"]);
        assert!(TaskRecord::default().tag_list().is_empty());
    }

    #[test]
    fn test_serialize_uses_header_names_and_skips_absent() {
        let record = TaskRecord::from_fields([("Name", "Fix bug"), ("Priority", "High")]);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["Name"], "Fix bug");
        assert_eq!(json["Priority"], "High");
        assert!(json.get("Assignee").is_none());
    }
}
