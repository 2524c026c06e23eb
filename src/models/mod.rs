//! Data models for task exports.
//!
//! - [`TaskRecord`] - One task row with typed, optional fields
//! - [`TaskField`] - The closed set of recognized export columns
//! - [`ColumnDef`] / [`VISIBLE_COLUMNS`] - Display and export column schema

pub mod columns;
pub mod record;

pub use columns::{ColumnDef, VISIBLE_COLUMNS};
pub use record::{TaskField, TaskRecord};
