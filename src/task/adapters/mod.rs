//! Adapter implementations of the task ports.
//!
//! - [`memory`]: volatile reference backend
//! - [`jsonl`]: one JSON record per line with atomic whole-file replace
//! - [`sqlite`]: single indexed table through Diesel
//! - [`system`]: UUID identifier generation

pub mod encoding;
pub mod jsonl;
pub mod memory;
pub mod sqlite;
pub mod system;
