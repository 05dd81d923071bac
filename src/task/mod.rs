//! Task tracking for tasknotes.
//!
//! This module implements task creation, paginated listing, status changes
//! and removal over interchangeable storage backends. It follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
