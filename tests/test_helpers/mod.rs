//! Shared fixtures and guards for integration tests.

use camino::Utf8PathBuf;
use chrono::{DateTime, TimeZone, Utc};
use std::env;
use std::ffi::OsString;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use tasknotes::task::{
    adapters::{
        jsonl::JsonlTaskRepository, memory::InMemoryTaskRepository, sqlite::SqliteTaskRepository,
    },
    domain::{PersistedTaskData, Task, TaskId, TaskStatus},
    ports::TaskRepository,
};
use tempfile::TempDir;

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Returns 2025-01-01T12:00:00Z plus `second` seconds.
///
/// # Panics
///
/// Panics if `second` is not a valid second of a minute.
#[must_use]
pub fn timestamp(second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, second)
        .single()
        .expect("valid timestamp")
}

/// Builds an open task without a description created at [`timestamp`].
#[must_use]
pub fn task_at(id: &str, title: &str, second: u32) -> Task {
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(id),
        title: title.to_owned(),
        description: None,
        created_at: timestamp(second),
        status: TaskStatus::Open,
    })
}

/// Mixed dataset with tied creation times and tied titles.
#[must_use]
pub fn dataset() -> Vec<Task> {
    vec![
        task_at("c", "Alpha", 2),
        task_at("a", "Charlie", 1),
        task_at("b", "Bravo", 1),
        task_at("d", "Alpha", 0),
    ]
}

/// Projects tasks onto their identifiers.
#[must_use]
pub fn ids(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.id().as_str()).collect()
}

/// Creates a temporary directory and a UTF-8 path for `file_name` inside it.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or its path is not
/// valid UTF-8.
pub fn temp_file(file_name: &str) -> eyre::Result<(TempDir, Utf8PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = Utf8PathBuf::try_from(dir.path().join(file_name))?;
    Ok((dir, path))
}

/// Storage backends exercised by the shared contract tests.
#[derive(Debug, Clone, Copy)]
pub enum BackendKind {
    /// Volatile in-process storage.
    Memory,
    /// JSON-lines file.
    Jsonl,
    /// `SQLite` table.
    Sqlite,
}

/// A repository plus whatever keeps its storage alive.
pub struct BackendHarness {
    /// Repository under test.
    pub repository: Arc<dyn TaskRepository>,
    _dir: Option<TempDir>,
}

impl BackendHarness {
    /// Opens an empty repository of the given kind.
    ///
    /// # Errors
    ///
    /// Returns an error if temporary storage cannot be prepared.
    pub fn open(kind: BackendKind) -> eyre::Result<Self> {
        let harness = match kind {
            BackendKind::Memory => Self {
                repository: Arc::new(InMemoryTaskRepository::new()),
                _dir: None,
            },
            BackendKind::Jsonl => {
                let (dir, path) = temp_file("tasks.jsonl")?;
                Self {
                    repository: Arc::new(JsonlTaskRepository::open(path)?),
                    _dir: Some(dir),
                }
            }
            BackendKind::Sqlite => {
                let (dir, path) = temp_file("tasks.db")?;
                Self {
                    repository: Arc::new(SqliteTaskRepository::connect(path.as_str())?),
                    _dir: Some(dir),
                }
            }
        };
        Ok(harness)
    }

    /// Opens a repository of the given kind and stores `tasks` in order.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be prepared or a task cannot be
    /// added.
    pub async fn seeded(kind: BackendKind, tasks: &[Task]) -> eyre::Result<Self> {
        let harness = Self::open(kind)?;
        for task in tasks {
            harness.repository.add(task).await?;
        }
        Ok(harness)
    }
}

/// Guard that applies a scoped environment variable update.
pub struct EnvVarGuard {
    previous: Vec<(OsString, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Sets or clears multiple environment variables for the guard lifetime.
    pub fn set_many(changes: &[(&str, Option<&str>)]) -> Self {
        let lock = env_lock();
        let mut previous = Vec::with_capacity(changes.len());

        for (key, value) in changes {
            previous.push((OsString::from(key), env::var_os(key)));
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                match value {
                    Some(new_value) => env::set_var(key, new_value),
                    None => env::remove_var(key),
                }
            }
        }

        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                match value {
                    Some(previous) => env::set_var(&key, &previous),
                    None => env::remove_var(&key),
                }
            }
        }
    }
}

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
