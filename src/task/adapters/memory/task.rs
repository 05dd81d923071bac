//! In-memory task repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{Task, TaskId},
    ports::{ListQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Data lives only as long as the process. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with the given tasks.
    ///
    /// Seeding is not an insert: when two tasks share an identifier the
    /// later one wins.
    #[must_use]
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let seeded = tasks
            .into_iter()
            .map(|task| (task.id().clone(), task))
            .collect();
        Self {
            state: Arc::new(RwLock::new(seeded)),
        }
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, HashMap<TaskId, Task>>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, HashMap<TaskId, Task>>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn add(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if state.contains_key(task.id()) {
            return Err(TaskRepositoryError::AlreadyExists(task.id().clone()));
        }
        state.insert(task.id().clone(), task.clone());
        Ok(())
    }

    async fn get(&self, id: &TaskId) -> TaskRepositoryResult<Task> {
        let state = self.read()?;
        state
            .get(id)
            .cloned()
            .ok_or_else(|| TaskRepositoryError::NotFound(id.clone()))
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .get_mut(task.id())
            .ok_or_else(|| TaskRepositoryError::NotFound(task.id().clone()))?;
        *stored = task.clone();
        Ok(())
    }

    async fn remove(&self, id: &TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| TaskRepositoryError::NotFound(id.clone()))
    }

    async fn list_all(&self, query: ListQuery) -> TaskRepositoryResult<Vec<Task>> {
        let snapshot: Vec<Task> = self.read()?.values().cloned().collect();
        Ok(query.paginate(snapshot))
    }

    async fn count_all(&self) -> TaskRepositoryResult<usize> {
        Ok(self.read()?.len())
    }

    async fn exists(&self, id: &TaskId) -> TaskRepositoryResult<bool> {
        Ok(self.read()?.contains_key(id))
    }
}
