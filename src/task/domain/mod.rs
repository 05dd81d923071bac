//! Domain model for task tracking.
//!
//! The task domain holds the immutable task record, its status enumeration
//! and the error vocabulary shared by every layer, keeping all storage
//! concerns outside of the domain boundary.

mod error;
mod ids;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError, TaskErrorKind};
pub use ids::TaskId;
pub use task::{PersistedTaskData, Task, TaskStatus};
