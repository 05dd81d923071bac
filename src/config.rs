//! Storage configuration and explicit service construction.
//!
//! The entry point decides which backend owns the task data and builds one
//! long-lived [`TaskLifecycleService`] from it; nothing here is global.

use crate::task::{
    adapters::{
        jsonl::JsonlTaskRepository, memory::InMemoryTaskRepository, sqlite::SqliteTaskRepository,
        system::UuidIdProvider,
    },
    ports::{TaskRepository, TaskRepositoryError},
    services::TaskLifecycleService,
};
use camino::Utf8PathBuf;
use mockable::DefaultClock;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Environment variable naming the backend (`memory`, `jsonl` or `sqlite`).
pub const BACKEND_ENV: &str = "TASKS_BACKEND";

/// Environment variable holding the file path or database URL.
pub const PATH_ENV: &str = "TASKS_PATH";

/// Lifecycle service wired with the configured backend, the system clock and
/// UUID identifiers.
pub type DefaultTaskService =
    TaskLifecycleService<dyn TaskRepository, DefaultClock, UuidIdProvider>;

/// Storage backend selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StorageBackend {
    /// Volatile process-lifetime storage.
    #[default]
    Memory,
    /// One JSON record per line in a single file.
    #[serde(rename = "jsonl")]
    JsonLines {
        /// Path of the task file.
        path: Utf8PathBuf,
    },
    /// A `tasks` table in a `SQLite` database.
    Sqlite {
        /// Database path or URL understood by `SQLite`.
        database_url: String,
    },
}

impl StorageBackend {
    /// Returns the configuration name of the backend.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::JsonLines { .. } => "jsonl",
            Self::Sqlite { .. } => "sqlite",
        }
    }
}

/// Errors raised while resolving or applying storage configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The backend name is not recognised.
    #[error("unknown storage backend '{0}', expected memory, jsonl or sqlite")]
    UnknownBackend(String),

    /// A durable backend was selected without a location.
    #[error("storage backend '{0}' requires TASKS_PATH to be set")]
    MissingPath(&'static str),

    /// The selected backend could not be opened.
    #[error("failed to open task storage: {0}")]
    Repository(#[from] TaskRepositoryError),
}

/// Storage configuration for the task service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Selected backend.
    #[serde(default)]
    pub backend: StorageBackend,
}

impl StorageConfig {
    /// Creates a configuration for the given backend.
    #[must_use]
    pub const fn new(backend: StorageBackend) -> Self {
        Self { backend }
    }

    /// Resolves the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// See [`StorageConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration through an arbitrary key lookup.
    ///
    /// Without an explicit backend, a path selects the JSON-lines file and
    /// no path selects memory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownBackend`] for an unrecognised name or
    /// [`ConfigError::MissingPath`] when a durable backend has no location.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let location = lookup(PATH_ENV).filter(|value| !value.trim().is_empty());
        let requested = lookup(BACKEND_ENV).map(|value| value.trim().to_ascii_lowercase());

        let backend = match requested.as_deref() {
            None | Some("") => location.map_or(StorageBackend::Memory, |path| {
                StorageBackend::JsonLines { path: path.into() }
            }),
            Some("memory") => StorageBackend::Memory,
            Some("jsonl") => StorageBackend::JsonLines {
                path: location.ok_or(ConfigError::MissingPath("jsonl"))?.into(),
            },
            Some("sqlite") => StorageBackend::Sqlite {
                database_url: location.ok_or(ConfigError::MissingPath("sqlite"))?,
            },
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_owned())),
        };
        Ok(Self { backend })
    }

    /// Opens the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Repository`] when a durable backend cannot be
    /// opened.
    pub fn build_repository(&self) -> Result<Arc<dyn TaskRepository>, ConfigError> {
        let repository: Arc<dyn TaskRepository> = match &self.backend {
            StorageBackend::Memory => Arc::new(InMemoryTaskRepository::new()),
            StorageBackend::JsonLines { path } => {
                Arc::new(JsonlTaskRepository::open(path.clone())?)
            }
            StorageBackend::Sqlite { database_url } => {
                Arc::new(SqliteTaskRepository::connect(database_url)?)
            }
        };
        Ok(repository)
    }
}

/// Builds the task service for the given configuration.
///
/// # Errors
///
/// Returns [`ConfigError::Repository`] when the backend cannot be opened.
pub fn build_service(config: &StorageConfig) -> Result<DefaultTaskService, ConfigError> {
    let repository = config.build_repository()?;
    info!(backend = config.backend.name(), "built task service");
    Ok(TaskLifecycleService::new(
        repository,
        Arc::new(DefaultClock),
        Arc::new(UuidIdProvider),
    ))
}
