//! Service layer for task creation, listing and status changes.

use crate::task::{
    domain::{Task, TaskDomainError, TaskErrorKind, TaskId, TaskStatus},
    ports::{IdProvider, ListQuery, TaskOrder, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for listing one page of tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTasksRequest {
    page: u32,
    page_size: u32,
    order_by: TaskOrder,
}

impl ListTasksRequest {
    /// Creates a request for the given one-based page.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            order_by: TaskOrder::default(),
        }
    }

    /// Sets the primary sort key.
    #[must_use]
    pub const fn with_order_by(mut self, order_by: TaskOrder) -> Self {
        self.order_by = order_by;
        self
    }
}

impl Default for ListTasksRequest {
    fn default() -> Self {
        Self::new(1, 20)
    }
}

/// One page of tasks plus the unpaginated total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPage {
    /// Tasks on this page, in listing order.
    pub items: Vec<Task>,
    /// Number of tasks in the whole store.
    pub total: usize,
}

impl TaskPage {
    /// Splits the page into `(items, total)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Task>, usize) {
        (self.items, self.total)
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl TaskLifecycleError {
    /// Returns the coarse error classification.
    #[must_use]
    pub const fn kind(&self) -> TaskErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(err) => err.kind(),
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Validates input, generates identifiers and timestamps, and delegates
/// persistence to the injected repository.
pub struct TaskLifecycleService<R, C, I>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
    I: IdProvider,
{
    repository: Arc<R>,
    clock: Arc<C>,
    ids: Arc<I>,
}

impl<R, C, I> Clone for TaskLifecycleService<R, C, I>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
    I: IdProvider,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            ids: Arc::clone(&self.ids),
        }
    }
}

impl<R, C, I> TaskLifecycleService<R, C, I>
where
    R: TaskRepository + ?Sized,
    C: Clock + Send + Sync,
    I: IdProvider,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>, ids: Arc<I>) -> Self {
        Self {
            repository,
            clock,
            ids,
        }
    }

    /// Returns the injected repository.
    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Creates an open task and stores it.
    ///
    /// The title is stored exactly as given; surrounding whitespace only
    /// matters for the emptiness check.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title, or the
    /// repository error when the task cannot be stored.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        if request.title.trim().is_empty() {
            return Err(TaskDomainError::EmptyTitle.into());
        }

        let task = Task::new(
            self.ids.next_id(),
            request.title,
            request.description,
            &*self.clock,
        );
        self.repository.add(&task).await?;
        debug!(task_id = %task.id(), "created task");
        Ok(task)
    }

    /// Returns one page of tasks and the total task count.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPage`] or
    /// [`TaskDomainError::InvalidPageSize`] for values below one, or the
    /// repository error when the store cannot be read.
    pub async fn list_tasks(&self, request: ListTasksRequest) -> TaskLifecycleResult<TaskPage> {
        if request.page < 1 {
            return Err(TaskDomainError::InvalidPage(request.page).into());
        }
        if request.page_size < 1 {
            return Err(TaskDomainError::InvalidPageSize(request.page_size).into());
        }

        let page_size = i64::from(request.page_size);
        // Saturates far past any real dataset, so huge pages list nothing.
        let offset = (i64::from(request.page) - 1).saturating_mul(page_size);
        let query = ListQuery::new()
            .with_offset(offset)
            .with_limit(page_size)
            .with_order_by(request.order_by);

        let total = self.repository.count_all().await?;
        let items = self.repository.list_all(query).await?;
        Ok(TaskPage { items, total })
    }

    /// Fetches a single task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    pub async fn get_task(&self, id: &TaskId) -> TaskLifecycleResult<Task> {
        Ok(self.repository.get(id).await?)
    }

    /// Moves a task to [`TaskStatus::InProgress`].
    ///
    /// Idempotent: a task already in progress is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    pub async fn mark_in_progress(&self, id: &TaskId) -> TaskLifecycleResult<Task> {
        self.transition(id, TaskStatus::InProgress).await
    }

    /// Moves a task to [`TaskStatus::Closed`].
    ///
    /// Idempotent: a closed task is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    pub async fn mark_done(&self, id: &TaskId) -> TaskLifecycleResult<Task> {
        self.transition(id, TaskStatus::Closed).await
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    pub async fn remove_task(&self, id: &TaskId) -> TaskLifecycleResult<()> {
        self.repository.remove(id).await?;
        debug!(task_id = %id, "removed task");
        Ok(())
    }

    async fn transition(&self, id: &TaskId, target: TaskStatus) -> TaskLifecycleResult<Task> {
        let task = self.repository.get(id).await?;
        if task.status() == target {
            return Ok(task);
        }

        let updated = task.with_status(target);
        self.repository.update(&updated).await?;
        debug!(
            task_id = %id,
            from = %task.status(),
            to = %target,
            "changed task status"
        );
        Ok(updated)
    }
}
