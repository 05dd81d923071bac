//! Identifier generation port.

use crate::task::domain::TaskId;

/// Source of fresh task identifiers.
///
/// Injected into the lifecycle service so creation is deterministic under
/// test.
pub trait IdProvider: Send + Sync {
    /// Returns an identifier that has not been handed out before.
    fn next_id(&self) -> TaskId;
}
