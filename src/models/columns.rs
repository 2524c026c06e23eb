use super::record::TaskField;

/// A column shown in the results table and written by exports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub field: TaskField,
    pub label: &'static str,
}

impl ColumnDef {
    pub const fn new(field: TaskField, label: &'static str) -> Self {
        Self { field, label }
    }
}

/// Fixed column order for display and export
pub const VISIBLE_COLUMNS: [ColumnDef; 8] = [
    ColumnDef::new(TaskField::TaskId, "ID"),
    ColumnDef::new(TaskField::Name, "Task Name"),
    ColumnDef::new(TaskField::Section, "Section"),
    ColumnDef::new(TaskField::Assignee, "Assignee"),
    ColumnDef::new(TaskField::Notes, "Description"),
    ColumnDef::new(TaskField::CreatedAt, "Created"),
    ColumnDef::new(TaskField::CompletedAt, "Completed"),
    ColumnDef::new(TaskField::Tags, "Tags"),
];
