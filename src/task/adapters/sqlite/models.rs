//! Diesel row models for task persistence.

use super::schema::tasks;
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TaskRow {
    /// Task identifier.
    pub task_id: String,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Canonical creation timestamp.
    pub created_at: String,
    /// Status label.
    pub status: String,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub task_id: String,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Canonical creation timestamp.
    pub created_at: String,
    /// Status label.
    pub status: String,
}

/// Full-record replacement for every non-key column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Task title.
    pub title: String,
    /// Optional description; `None` clears the column.
    pub description: Option<String>,
    /// Canonical creation timestamp.
    pub created_at: String,
    /// Status label.
    pub status: String,
}
