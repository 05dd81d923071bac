//! Shared fixtures for `SQLite` repository tests.

use crate::test_helpers::temp_file;
use camino::Utf8PathBuf;
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use rstest::fixture;
use tasknotes::task::adapters::sqlite::SqliteTaskRepository;
use tempfile::TempDir;

/// A repository over a fresh database file in its own temporary directory.
pub struct SqliteStore {
    /// Repository under test.
    pub repo: SqliteTaskRepository,
    /// Path of the database file.
    pub path: Utf8PathBuf,
    _dir: TempDir,
}

impl SqliteStore {
    /// Opens a second repository over the same database.
    ///
    /// # Panics
    ///
    /// Panics if the database cannot be reopened.
    #[must_use]
    pub fn reopen(&self) -> SqliteTaskRepository {
        SqliteTaskRepository::connect(self.path.as_str()).expect("reopen database")
    }

    /// Runs raw SQL on a separate connection, bypassing the repository.
    ///
    /// # Panics
    ///
    /// Panics if the connection or statement fails.
    pub fn execute_raw(&self, sql: &str) {
        let mut connection =
            SqliteConnection::establish(self.path.as_str()).expect("raw connection");
        diesel::sql_query(sql)
            .execute(&mut connection)
            .expect("raw statement");
    }
}

/// Provides an empty database with the task schema applied.
#[fixture]
pub fn store() -> SqliteStore {
    let (dir, path) = temp_file("tasks.db").expect("temp database path");
    let repo = SqliteTaskRepository::connect(path.as_str()).expect("open database");
    SqliteStore {
        repo,
        path,
        _dir: dir,
    }
}
