//! `SQLite` adapters for relational task persistence.

mod models;
mod repository;
mod schema;

pub use repository::{CREATE_TASKS_SQL, SqliteTaskRepository, TaskSqlitePool, apply_schema};
