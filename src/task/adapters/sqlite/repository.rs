//! `SQLite` repository implementation for relational task storage.
//!
//! Each operation is a single statement, so atomicity and durability come
//! from the engine itself.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::task::{
    adapters::encoding::{format_timestamp, parse_timestamp},
    domain::{PersistedTaskData, Task, TaskId, TaskStatus},
    ports::{ListQuery, TaskOrder, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info};

/// `SQLite` connection pool type used by task adapters.
pub type TaskSqlitePool = Pool<ConnectionManager<SqliteConnection>>;

/// Schema for the `tasks` table and its ordering indexes.
pub const CREATE_TASKS_SQL: &str =
    include_str!("../../../../migrations/2026-10-19-000000_create_tasks/up.sql");

/// `SQLite`-backed task repository.
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    pool: TaskSqlitePool,
}

impl SqliteTaskRepository {
    /// Creates a new repository from an existing connection pool.
    ///
    /// The `tasks` table must already exist; see [`apply_schema`].
    #[must_use]
    pub const fn new(pool: TaskSqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the database at `database_url` and ensures the schema exists.
    ///
    /// The pool holds a single connection that is never recycled, so writes
    /// never contend for the database lock and `:memory:` databases survive
    /// for the lifetime of the repository.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the pool cannot be
    /// built or the schema cannot be applied.
    pub fn connect(database_url: &str) -> TaskRepositoryResult<Self> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)
            .map_err(TaskRepositoryError::persistence)?;
        {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            apply_schema(&mut connection)?;
        }
        info!(database_url, "opened SQLite task store");
        Ok(Self::new(pool))
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

/// Creates the `tasks` table and indexes when they are missing.
///
/// # Errors
///
/// Returns [`TaskRepositoryError::Persistence`] if the DDL fails.
pub fn apply_schema(connection: &mut SqliteConnection) -> TaskRepositoryResult<()> {
    connection
        .batch_execute(CREATE_TASKS_SQL)
        .map_err(TaskRepositoryError::persistence)
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn add(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id().clone();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::AlreadyExists(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn get(&self, id: &TaskId) -> TaskRepositoryResult<Task> {
        let lookup_id = id.clone();
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(lookup_id.as_str())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task)
                .transpose()?
                .ok_or(TaskRepositoryError::NotFound(lookup_id))
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id().clone();
        let changeset = to_changeset(task);

        self.run_blocking(move |connection| {
            let affected = diesel::update(tasks::table.find(task_id.as_str()))
                .set(&changeset)
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn remove(&self, id: &TaskId) -> TaskRepositoryResult<()> {
        let task_id = id.clone();
        self.run_blocking(move |connection| {
            let affected = diesel::delete(tasks::table.find(task_id.as_str()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn list_all(&self, query: ListQuery) -> TaskRepositoryResult<Vec<Task>> {
        if query.is_empty_page() {
            return Ok(Vec::new());
        }

        self.run_blocking(move |connection| {
            let mut statement = tasks::table.select(TaskRow::as_select()).into_boxed();
            statement = match query.order_by() {
                TaskOrder::CreatedAt => {
                    statement.order((tasks::created_at.asc(), tasks::task_id.asc()))
                }
                TaskOrder::Title => statement.order((tasks::title.asc(), tasks::task_id.asc())),
            };
            // SQLite reads a negative LIMIT as unbounded.
            let rows = statement
                .limit(query.limit().unwrap_or(-1))
                .offset(query.offset())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            debug!(
                order_by = query.order_by().as_str(),
                returned = rows.len(),
                "listed tasks"
            );
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn count_all(&self) -> TaskRepositoryResult<usize> {
        self.run_blocking(|connection| {
            let total = tasks::table
                .count()
                .get_result::<i64>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            usize::try_from(total).map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn exists(&self, id: &TaskId) -> TaskRepositoryResult<bool> {
        let lookup_id = id.clone();
        self.run_blocking(move |connection| {
            diesel::select(diesel::dsl::exists(tasks::table.find(lookup_id.as_str())))
                .get_result::<bool>(connection)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        task_id: task.id().as_str().to_owned(),
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        created_at: format_timestamp(task.created_at()),
        status: task.status().as_str().to_owned(),
    }
}

fn to_changeset(task: &Task) -> TaskChangeset {
    TaskChangeset {
        title: task.title().to_owned(),
        description: task.description().map(str::to_owned),
        created_at: format_timestamp(task.created_at()),
        status: task.status().as_str().to_owned(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        task_id,
        title,
        description,
        created_at: persisted_created_at,
        status: persisted_status,
    } = row;

    let location = format!("tasks/{task_id}");
    let created_at = parse_timestamp(&persisted_created_at)
        .map_err(|err| TaskRepositoryError::corrupt_record(location.as_str(), err))?;
    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(|err| TaskRepositoryError::corrupt_record(location.as_str(), err))?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::new(task_id),
        title,
        description,
        created_at,
        status,
    }))
}
