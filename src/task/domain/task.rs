//! Task entity and status lifecycle types.

use super::{ParseTaskStatusError, TaskId};
use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;
use std::fmt;

/// Task lifecycle status.
///
/// Backends do not enforce transition order; the lifecycle service decides
/// which transitions a use case performs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    /// Task has been created and work has not started.
    #[default]
    Open,
    /// Task is being worked on.
    InProgress,
    /// Task has been completed.
    Closed,
}

impl TaskStatus {
    /// Returns the canonical storage label.
    ///
    /// Every durable backend persists statuses with this label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Closed => "Closed",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Open" => Ok(Self::Open),
            "In Progress" => Ok(Self::InProgress),
            "Closed" => Ok(Self::Closed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable task record.
///
/// Status changes produce a new value through [`Task::with_status`]; the
/// identifier, title, description and creation time are carried over
/// unchanged. Creation timestamps are held at whole-second precision so the
/// canonical storage encoding round-trips without loss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    status: TaskStatus,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title, stored exactly as given at creation.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
}

impl Task {
    /// Creates a new open task stamped with the current clock time.
    ///
    /// No validation happens here; the lifecycle service checks titles
    /// before building tasks.
    #[must_use]
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        description: Option<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description,
            created_at: clock.utc().trunc_subsecs(0),
            status: TaskStatus::Open,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            created_at: data.created_at.trunc_subsecs(0),
            status: data.status,
        }
    }

    /// Returns a copy of this task carrying the given status.
    #[must_use]
    pub fn with_status(&self, status: TaskStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }
}
