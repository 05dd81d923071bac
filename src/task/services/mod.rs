//! Application services for task orchestration.

mod lifecycle;

pub use lifecycle::{
    CreateTaskRequest, ListTasksRequest, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService, TaskPage,
};
