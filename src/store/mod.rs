//! In-memory record store.
//!
//! Holds the currently loaded tasks in source order. Content is only ever replaced wholesale by
//! [`RecordStore::load`]; there is no merge or partial update.

use crate::models::TaskRecord;

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<TaskRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored records with a new sequence
    pub fn load(&mut self, records: Vec<TaskRecord>) {
        self.records = records;
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }
}

impl From<Vec<TaskRecord>> for RecordStore {
    fn from(records: Vec<TaskRecord>) -> Self {
        Self { records }
    }
}
