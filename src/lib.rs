//! Tasknotes: task tracking over interchangeable storage backends.
//!
//! This crate provides create, read, update, delete and paginated listing of
//! tasks behind a single storage contract with three backends: a volatile
//! in-memory map, a crash-safe JSON-lines file and a `SQLite` table.
//!
//! # Architecture
//!
//! Tasknotes follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (files, database, ids)
//!
//! # Modules
//!
//! - [`config`]: Storage selection and explicit service construction
//! - [`task`]: Task domain, storage contract, backends and lifecycle service

pub mod config;
pub mod task;
