//! Task list persistence as a single JSON document.
//!
//! # Responsibility
//! - Load the ordered task list from the `tasks` key.
//! - Replace the whole document on every save.
//!
//! # Invariants
//! - Payload shape is `[{id, text, completed, date}]` with no version field.
//! - A missing key means an empty list.
//! - Bad stored records surface as [`RepoError::InvalidData`], never as
//!   input validation errors.

use crate::model::task::Task;
use crate::repo::kv_store::KeyValueStore;
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use std::collections::HashSet;

/// Fixed storage key for the task list document.
pub const TASKS_STORAGE_KEY: &str = "tasks";

/// Repository interface for the task list document.
pub trait TaskRepository {
    fn load_tasks(&self) -> RepoResult<Vec<Task>>;
    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()>;
}

/// Task repository storing JSON under [`TASKS_STORAGE_KEY`].
pub struct KvTaskRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvTaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> TaskRepository for KvTaskRepository<S> {
    fn load_tasks(&self) -> RepoResult<Vec<Task>> {
        let Some(raw) = self.store.get_item(TASKS_STORAGE_KEY)? else {
            return Ok(Vec::new());
        };

        let tasks: Vec<Task> = serde_json::from_str(&raw).map_err(|err| {
            warn!("event=tasks_load module=repo status=error error_code=invalid_json");
            RepoError::InvalidData(format!("`{TASKS_STORAGE_KEY}` is not a task array: {err}"))
        })?;

        let mut seen = HashSet::with_capacity(tasks.len());
        for task in &tasks {
            task.validate().map_err(|err| {
                warn!("event=tasks_load module=repo status=error error_code=invalid_record");
                RepoError::InvalidData(format!("stored task `{}` is invalid: {err}", task.id))
            })?;
            if !seen.insert(task.id) {
                return Err(RepoError::InvalidData(format!(
                    "duplicate task id `{}` in `{TASKS_STORAGE_KEY}`",
                    task.id
                )));
            }
        }

        info!("event=tasks_load module=repo status=ok count={}", tasks.len());
        Ok(tasks)
    }

    fn save_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        for task in tasks {
            task.validate()?;
        }

        let payload = serde_json::to_string(tasks)
            .map_err(|err| RepoError::InvalidData(format!("task serialization failed: {err}")))?;
        self.store.set_item(TASKS_STORAGE_KEY, &payload)?;

        info!("event=tasks_save module=repo status=ok count={}", tasks.len());
        Ok(())
    }
}
