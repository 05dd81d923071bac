//! Shared world state for task status BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use tasknotes::task::{
    adapters::{memory::InMemoryTaskRepository, system::UuidIdProvider},
    domain::Task,
    services::{TaskLifecycleError, TaskLifecycleService},
};

/// Service type used by the BDD world.
pub type TestTaskService =
    TaskLifecycleService<InMemoryTaskRepository, DefaultClock, UuidIdProvider>;

/// Scenario world for task status behaviour tests.
pub struct TaskStatusWorld {
    pub service: TestTaskService,
    pub last_task: Option<Task>,
    pub last_result: Option<Result<Task, TaskLifecycleError>>,
}

impl TaskStatusWorld {
    /// Creates a world backed by an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let service = TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(DefaultClock),
            Arc::new(UuidIdProvider),
        );

        Self {
            service,
            last_task: None,
            last_result: None,
        }
    }

    /// Records an operation outcome, remembering the task on success.
    pub fn record(&mut self, result: Result<Task, TaskLifecycleError>) {
        if let Ok(ref task) = result {
            self.last_task = Some(task.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for TaskStatusWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskStatusWorld {
    TaskStatusWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
