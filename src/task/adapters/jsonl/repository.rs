//! JSON-lines repository implementation for durable task storage.
//!
//! Every mutation loads the whole file, applies the change in memory and
//! writes the full dataset to a `.swap` sibling. The sibling is flushed to
//! stable storage and renamed over the original in one atomic replace, so a
//! crash leaves either the old or the new file and readers never observe a
//! partial write. Two processes mutating the same file can still lose each
//! other's updates; only crash safety is provided.

use super::record::{decode_record_line, encode_record_line};
use crate::task::{
    domain::{Task, TaskId},
    ports::{ListQuery, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::collections::HashSet;
use std::io::{self, BufWriter, Write};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

const SWAP_SUFFIX: &str = ".swap";

/// Durable task repository storing one JSON record per line.
#[derive(Debug, Clone)]
pub struct JsonlTaskRepository {
    store: Arc<JsonlFile>,
}

#[derive(Debug)]
struct JsonlFile {
    path: Utf8PathBuf,
    dir: Dir,
    file_name: String,
    swap_name: String,
    write_lock: Mutex<()>,
}

impl JsonlTaskRepository {
    /// Opens a repository backed by the file at `path`.
    ///
    /// The parent directory is created when missing. The file itself is
    /// created by the first mutation; until then the store reads as empty.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the path has no file
    /// name or the parent directory cannot be created or opened.
    pub fn open(path: impl Into<Utf8PathBuf>) -> TaskRepositoryResult<Self> {
        let file_path: Utf8PathBuf = path.into();
        let file_name = file_path
            .file_name()
            .ok_or_else(|| {
                TaskRepositoryError::persistence(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("task file path '{file_path}' has no file name"),
                ))
            })?
            .to_owned();
        let parent = file_path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .map_or_else(|| Utf8PathBuf::from("."), Utf8Path::to_path_buf);

        Dir::create_ambient_dir_all(&parent, ambient_authority())
            .map_err(TaskRepositoryError::persistence)?;
        let dir = Dir::open_ambient_dir(&parent, ambient_authority())
            .map_err(TaskRepositoryError::persistence)?;

        info!(path = %file_path, "opened JSON-lines task store");
        let swap_name = format!("{file_name}{SWAP_SUFFIX}");
        Ok(Self {
            store: Arc::new(JsonlFile {
                path: file_path,
                dir,
                file_name,
                swap_name,
                write_lock: Mutex::new(()),
            }),
        })
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.store.path
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&JsonlFile) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(TaskRepositoryError::persistence)?
    }
}

impl JsonlFile {
    /// Reads every record, skipping blank lines. A missing file is empty.
    fn load(&self) -> TaskRepositoryResult<Vec<Task>> {
        let contents = match self.dir.read(&self.file_name) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(TaskRepositoryError::persistence(err)),
        };

        let mut tasks = Vec::new();
        let mut seen = HashSet::new();
        for (index, raw_line) in contents.split(|byte| *byte == b'\n').enumerate() {
            let location = format!("{}:{}", self.file_name, index + 1);
            let line = std::str::from_utf8(raw_line)
                .map_err(|err| TaskRepositoryError::corrupt_record(location.as_str(), err))?
                .trim();
            if line.is_empty() {
                continue;
            }
            let task = decode_record_line(line)
                .map_err(|err| TaskRepositoryError::corrupt_record(location.as_str(), err))?;
            if !seen.insert(task.id().clone()) {
                return Err(TaskRepositoryError::corrupt_record(
                    location,
                    format!("duplicate task_id '{}'", task.id()),
                ));
            }
            tasks.push(task);
        }

        debug!(path = %self.path, count = tasks.len(), "loaded task file");
        Ok(tasks)
    }

    /// Runs a load-mutate-persist cycle while holding the write lock.
    fn mutate<F>(&self, change: F) -> TaskRepositoryResult<()>
    where
        F: FnOnce(&mut Vec<Task>) -> TaskRepositoryResult<()>,
    {
        let _guard = self.write_lock.lock().map_err(|err| {
            TaskRepositoryError::persistence(io::Error::other(err.to_string()))
        })?;
        let mut tasks = self.load()?;
        change(&mut tasks)?;
        self.persist(&tasks)
    }

    /// Atomically replaces the file with the given dataset.
    fn persist(&self, tasks: &[Task]) -> TaskRepositoryResult<()> {
        let replaced = self
            .write_swap(tasks)
            .and_then(|()| self.dir.rename(&self.swap_name, &self.dir, &self.file_name));
        if let Err(err) = replaced {
            self.discard_swap();
            return Err(TaskRepositoryError::persistence(err));
        }
        debug!(path = %self.path, count = tasks.len(), "persisted task file");
        Ok(())
    }

    fn write_swap(&self, tasks: &[Task]) -> io::Result<()> {
        let mut writer = BufWriter::new(self.dir.create(&self.swap_name)?);
        for task in tasks {
            let line = encode_record_line(task).map_err(io::Error::other)?;
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
        file.sync_all()
    }

    /// Best-effort removal of a leftover swap file.
    fn discard_swap(&self) {
        if let Err(err) = self.dir.remove_file(&self.swap_name) {
            if err.kind() != io::ErrorKind::NotFound {
                warn!(
                    path = %self.path,
                    swap = %self.swap_name,
                    error = %err,
                    "failed to remove swap file"
                );
            }
        }
    }
}

fn position_of(tasks: &[Task], id: &TaskId) -> Option<usize> {
    tasks.iter().position(|task| task.id() == id)
}

#[async_trait]
impl TaskRepository for JsonlTaskRepository {
    async fn add(&self, task: &Task) -> TaskRepositoryResult<()> {
        let new_task = task.clone();
        self.run_blocking(move |store| {
            store.mutate(|tasks| {
                if position_of(tasks, new_task.id()).is_some() {
                    return Err(TaskRepositoryError::AlreadyExists(new_task.id().clone()));
                }
                tasks.push(new_task);
                Ok(())
            })
        })
        .await
    }

    async fn get(&self, id: &TaskId) -> TaskRepositoryResult<Task> {
        let lookup_id = id.clone();
        self.run_blocking(move |store| {
            store
                .load()?
                .into_iter()
                .find(|task| task.id() == &lookup_id)
                .ok_or(TaskRepositoryError::NotFound(lookup_id))
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let replacement = task.clone();
        self.run_blocking(move |store| {
            store.mutate(|tasks| {
                let stored = tasks
                    .iter_mut()
                    .find(|stored| stored.id() == replacement.id())
                    .ok_or_else(|| TaskRepositoryError::NotFound(replacement.id().clone()))?;
                *stored = replacement;
                Ok(())
            })
        })
        .await
    }

    async fn remove(&self, id: &TaskId) -> TaskRepositoryResult<()> {
        let target = id.clone();
        self.run_blocking(move |store| {
            store.mutate(|tasks| {
                let index = position_of(tasks, &target)
                    .ok_or_else(|| TaskRepositoryError::NotFound(target.clone()))?;
                tasks.remove(index);
                Ok(())
            })
        })
        .await
    }

    async fn list_all(&self, query: ListQuery) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |store| Ok(query.paginate(store.load()?)))
            .await
    }

    async fn count_all(&self) -> TaskRepositoryResult<usize> {
        self.run_blocking(|store| Ok(store.load()?.len())).await
    }

    async fn exists(&self, id: &TaskId) -> TaskRepositoryResult<bool> {
        let lookup_id = id.clone();
        self.run_blocking(move |store| Ok(position_of(&store.load()?, &lookup_id).is_some()))
            .await
    }
}
