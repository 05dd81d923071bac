//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Coarse error classification shared by every layer.
///
/// Presentation code branches on the kind instead of matching adapter
/// specific variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskErrorKind {
    /// An insert collided with an existing task identifier.
    AlreadyExists,
    /// The addressed task does not exist.
    NotFound,
    /// Input or stored data failed validation.
    Validation,
    /// Underlying I/O, encoding or connectivity failure.
    Infrastructure,
}

/// Errors returned while validating use-case input at the service boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("invalid title: task title must not be empty")]
    EmptyTitle,

    /// The requested page number is below one.
    #[error("invalid page {0}: pages are numbered from 1")]
    InvalidPage(u32),

    /// The requested page size is below one.
    #[error("invalid page_size {0}: page size must be at least 1")]
    InvalidPageSize(u32),
}

impl TaskDomainError {
    /// Returns the name of the input field that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::InvalidPage(_) => "page",
            Self::InvalidPageSize(_) => "page_size",
        }
    }

    /// Domain errors are always validation failures.
    #[must_use]
    pub const fn kind(&self) -> TaskErrorKind {
        TaskErrorKind::Validation
    }
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
