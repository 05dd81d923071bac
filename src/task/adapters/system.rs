//! System-backed adapters for identifier generation.

use crate::task::{domain::TaskId, ports::IdProvider};
use uuid::Uuid;

/// Generates random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdProvider;

impl IdProvider for UuidIdProvider {
    fn next_id(&self) -> TaskId {
        TaskId::new(Uuid::new_v4().to_string())
    }
}
