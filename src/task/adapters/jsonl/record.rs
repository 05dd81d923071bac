//! Line format for the JSON-lines task file.
//!
//! Each non-blank line holds one object with the fields `task_id`, `title`,
//! `description` (string or null), `created_at` (`YYYY-MM-DDTHH:MM:SSZ`) and
//! `status` (`"Open"`, `"In Progress"` or `"Closed"`).

use crate::task::{
    adapters::encoding::{TimestampError, format_timestamp, parse_timestamp},
    domain::{ParseTaskStatusError, PersistedTaskData, Task, TaskId, TaskStatus},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Serialized shape of one task line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TaskRecord {
    task_id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    created_at: String,
    status: String,
}

/// Errors raised while decoding a task line.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The line is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The JSON value lacks a field or carries a field of the wrong type.
    #[error("malformed record: {0}")]
    Malformed(#[source] serde_json::Error),

    /// The creation timestamp is not canonical UTC.
    #[error(transparent)]
    Timestamp(#[from] TimestampError),

    /// The status is outside the closed set.
    #[error("status is not allowed: {0}")]
    Status(#[from] ParseTaskStatusError),
}

impl TaskRecord {
    fn from_task(task: &Task) -> Self {
        Self {
            task_id: task.id().as_str().to_owned(),
            title: task.title().to_owned(),
            description: task.description().map(str::to_owned),
            created_at: format_timestamp(task.created_at()),
            status: task.status().as_str().to_owned(),
        }
    }

    fn into_task(self) -> Result<Task, RecordError> {
        let created_at = parse_timestamp(&self.created_at)?;
        let status = TaskStatus::try_from(self.status.as_str())?;
        Ok(Task::from_persisted(PersistedTaskData {
            id: TaskId::new(self.task_id),
            title: self.title,
            description: self.description,
            created_at,
            status,
        }))
    }
}

/// Encodes a task as one JSON line without the trailing newline.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if serialization fails.
pub fn encode_record_line(task: &Task) -> serde_json::Result<String> {
    serde_json::to_string(&TaskRecord::from_task(task))
}

/// Decodes one JSON line into a task.
///
/// # Errors
///
/// Returns [`RecordError`] when the line is not JSON, misses a required
/// field, or carries an invalid timestamp or status.
pub fn decode_record_line(line: &str) -> Result<Task, RecordError> {
    let value: Value = serde_json::from_str(line).map_err(RecordError::InvalidJson)?;
    let record = TaskRecord::deserialize(value).map_err(RecordError::Malformed)?;
    record.into_task()
}
