//! Port contracts for task tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod ids;
pub mod query;
pub mod repository;

pub use ids::IdProvider;
pub use query::{ListQuery, ParseTaskOrderError, TaskOrder};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};

#[cfg(test)]
pub use repository::MockTaskRepository;
