//! Sort and pagination parameters for task listings.

use crate::task::domain::Task;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Primary sort key for task listings.
///
/// Every order is ascending and tie-broken by ascending task identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskOrder {
    /// Order by creation timestamp.
    #[default]
    CreatedAt,
    /// Order by title.
    Title,
}

impl TaskOrder {
    /// Returns the field name used to select this order.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Title => "title",
        }
    }

    /// Compares two tasks by this order, then by identifier.
    #[must_use]
    pub fn compare(self, left: &Task, right: &Task) -> Ordering {
        let primary = match self {
            Self::CreatedAt => left.created_at().cmp(&right.created_at()),
            Self::Title => left.title().cmp(right.title()),
        };
        primary.then_with(|| left.id().cmp(right.id()))
    }
}

impl TryFrom<&str> for TaskOrder {
    type Error = ParseTaskOrderError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "created_at" => Ok(Self::CreatedAt),
            "title" => Ok(Self::Title),
            _ => Err(ParseTaskOrderError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unsupported sort field.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported order field '{0}', expected created_at or title")]
pub struct ParseTaskOrderError(pub String);

/// Listing parameters applied after sorting.
///
/// A negative offset is clamped to zero. An absent limit returns every task
/// from the offset onwards; a limit of zero or less returns nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListQuery {
    offset: i64,
    limit: Option<i64>,
    order_by: TaskOrder,
}

impl ListQuery {
    /// Creates a query returning every task in creation order.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of sorted tasks to skip.
    #[must_use]
    pub const fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the maximum number of tasks to return.
    #[must_use]
    pub const fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the primary sort key.
    #[must_use]
    pub const fn with_order_by(mut self, order_by: TaskOrder) -> Self {
        self.order_by = order_by;
        self
    }

    /// Returns the offset clamped to zero.
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.offset.max(0)
    }

    /// Returns the requested limit, if any.
    #[must_use]
    pub const fn limit(&self) -> Option<i64> {
        self.limit
    }

    /// Returns the primary sort key.
    #[must_use]
    pub const fn order_by(&self) -> TaskOrder {
        self.order_by
    }

    /// Reports whether the query can only produce an empty page.
    #[must_use]
    pub fn is_empty_page(&self) -> bool {
        self.limit.is_some_and(|limit| limit <= 0)
    }

    /// Sorts the tasks and applies offset and limit.
    #[must_use]
    pub fn paginate(&self, mut tasks: Vec<Task>) -> Vec<Task> {
        if self.is_empty_page() {
            return Vec::new();
        }
        let order = self.order_by;
        tasks.sort_by(|left, right| order.compare(left, right));

        let skip = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let take = self
            .limit
            .map_or(usize::MAX, |limit| usize::try_from(limit).unwrap_or(usize::MAX));
        tasks.into_iter().skip(skip).take(take).collect()
    }
}
