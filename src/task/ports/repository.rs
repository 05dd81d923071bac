//! Repository port for task persistence and paginated listing.

use super::ListQuery;
use crate::task::domain::{Task, TaskErrorKind, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Implementations perform no business validation, map their own technical
/// failures to [`TaskRepositoryError::Persistence`], and order listings
/// identically for the same dataset.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::AlreadyExists`] when the task ID is
    /// already present.
    async fn add(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Fetches a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn get(&self, id: &TaskId) -> TaskRepositoryResult<Task>;

    /// Replaces the stored record carrying the same identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Deletes a task. Deleting an absent task is an error.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn remove(&self, id: &TaskId) -> TaskRepositoryResult<()>;

    /// Returns tasks sorted by the query order, then paginated.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] or
    /// [`TaskRepositoryError::CorruptRecord`] when the backing store cannot
    /// be read.
    async fn list_all(&self, query: ListQuery) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns the total number of stored tasks, ignoring pagination.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] or
    /// [`TaskRepositoryError::CorruptRecord`] when the backing store cannot
    /// be read.
    async fn count_all(&self) -> TaskRepositoryResult<usize>;

    /// Reports whether a task with the identifier exists.
    ///
    /// Never returns [`TaskRepositoryError::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] or
    /// [`TaskRepositoryError::CorruptRecord`] when the backing store cannot
    /// be read.
    async fn exists(&self, id: &TaskId) -> TaskRepositoryResult<bool>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("task already exists: {0}")]
    AlreadyExists(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A stored record could not be decoded.
    #[error("invalid stored record at {location}: {reason}")]
    CorruptRecord {
        /// Where the record lives, such as `tasks.jsonl:3`.
        location: String,
        /// Why decoding failed.
        reason: String,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Builds a corrupt-record error.
    pub fn corrupt_record(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::CorruptRecord {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns the coarse error classification.
    #[must_use]
    pub const fn kind(&self) -> TaskErrorKind {
        match self {
            Self::AlreadyExists(_) => TaskErrorKind::AlreadyExists,
            Self::NotFound(_) => TaskErrorKind::NotFound,
            Self::CorruptRecord { .. } => TaskErrorKind::Validation,
            Self::Persistence(_) => TaskErrorKind::Infrastructure,
        }
    }
}
