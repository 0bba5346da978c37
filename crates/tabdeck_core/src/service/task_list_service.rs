//! To-do list use-case service.
//!
//! # Responsibility
//! - Keep the in-memory ordered task list for one session.
//! - Persist the whole list through [`TaskRepository`] after every mutation.
//! - Drive the completed-task removal timeline.
//!
//! # Invariants
//! - The list is loaded once, at construction.
//! - Task ids are strictly increasing in creation order.
//! - Completing a task twice never schedules a second removal.
//! - Memory and timeline change only after the new list is saved; a failed
//!   save leaves both exactly as they were.

use crate::model::due_date::normalize_due_date;
use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use crate::service::completion_timeline::{CompletionTimeline, TaskEvent};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Service error for task list use-cases.
#[derive(Debug)]
pub enum TaskError {
    /// Task text is blank.
    EmptyText,
    /// Due date is not a `YYYY-MM-DD` calendar day.
    InvalidDate(String),
    /// No task with this id.
    NotFound(TaskId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "Please enter a task!"),
            Self::InvalidDate(value) => {
                write!(f, "invalid due date `{value}`; expected YYYY-MM-DD")
            }
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for TaskError {
    fn from(value: TaskValidationError) -> Self {
        match value {
            TaskValidationError::EmptyText => Self::EmptyText,
            TaskValidationError::InvalidDate(raw) => Self::InvalidDate(raw),
        }
    }
}

impl From<RepoError> for TaskError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => err.into(),
            other => Self::Repo(other),
        }
    }
}

pub type TaskResult<T> = Result<T, TaskError>;

/// Returns the current wall-clock time in epoch milliseconds.
pub fn current_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Task list facade over a repository implementation.
pub struct TaskListService<R: TaskRepository> {
    repo: R,
    tasks: Vec<Task>,
    timeline: CompletionTimeline,
}

impl<R: TaskRepository> TaskListService<R> {
    /// Loads persisted tasks and starts with an empty timeline.
    pub fn load(repo: R) -> TaskResult<Self> {
        Self::resume(repo, CompletionTimeline::new())
    }

    /// Loads persisted tasks and continues an existing timeline.
    ///
    /// Used by callers that reopen storage per call but keep pending
    /// removals alive across calls.
    pub fn resume(repo: R, timeline: CompletionTimeline) -> TaskResult<Self> {
        let tasks = repo.load_tasks()?;
        Ok(Self {
            repo,
            tasks,
            timeline,
        })
    }

    /// Releases the timeline so it can outlive this service instance.
    pub fn into_timeline(self) -> CompletionTimeline {
        self.timeline
    }

    /// Tasks in creation order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn timeline(&self) -> &CompletionTimeline {
        &self.timeline
    }

    /// Appends a new open task.
    ///
    /// # Contract
    /// - `text` is trimmed and must be non-empty.
    /// - Blank `date` means no due date.
    /// - `id` is `now_ms`, bumped past the newest id when the clock collides.
    pub fn add_task(&mut self, text: &str, date: Option<&str>, now_ms: i64) -> TaskResult<TaskId> {
        let id = self.next_id(now_ms);
        let task = Task::new(id, text, date)?;

        let mut next = self.tasks.clone();
        next.push(task);
        self.commit(next)?;
        info!("event=task_add module=tasks status=ok task_id={id}");
        Ok(id)
    }

    /// Deletes a task by id and drops any pending removal stages for it.
    pub fn delete_task(&mut self, id: TaskId) -> TaskResult<()> {
        let position = self.position(id).ok_or(TaskError::NotFound(id))?;

        let mut next = self.tasks.clone();
        next.remove(position);
        self.commit(next)?;
        self.timeline.cancel(id);
        info!("event=task_delete module=tasks status=ok task_id={id}");
        Ok(())
    }

    /// Marks a task completed and schedules its removal.
    ///
    /// Returns `Ok(false)` without side effects when the task is unknown or
    /// already completed.
    pub fn complete_task(&mut self, id: TaskId, now_ms: i64) -> TaskResult<bool> {
        let Some(position) = self.position(id) else {
            return Ok(false);
        };
        if self.tasks[position].completed {
            return Ok(false);
        }

        let mut next = self.tasks.clone();
        next[position].completed = true;
        self.commit(next)?;
        self.timeline.schedule(id, now_ms);
        info!("event=task_complete module=tasks status=ok task_id={id}");
        Ok(true)
    }

    /// Replaces a task's text.
    ///
    /// Blank input is treated as a cancelled edit and returns `Ok(false)`.
    pub fn edit_task_text(&mut self, id: TaskId, text: &str) -> TaskResult<bool> {
        let position = self.position(id).ok_or(TaskError::NotFound(id))?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut next = self.tasks.clone();
        next[position].text = trimmed.to_string();
        self.commit(next)?;
        info!("event=task_edit module=tasks status=ok task_id={id} field=text");
        Ok(true)
    }

    /// Replaces or clears a task's due date. Blank input clears it.
    pub fn edit_task_date(&mut self, id: TaskId, date: Option<&str>) -> TaskResult<()> {
        let normalized = normalize_due_date(date)?;
        let position = self.position(id).ok_or(TaskError::NotFound(id))?;

        let mut next = self.tasks.clone();
        next[position].date = normalized;
        self.commit(next)?;
        info!("event=task_edit module=tasks status=ok task_id={id} field=date");
        Ok(())
    }

    /// Fires due timeline stages and removes tasks whose removal is due.
    ///
    /// Removal of a task that no longer exists is reported but has no effect.
    /// When the save fails, no stage is consumed and the next call retries.
    pub fn advance(&mut self, now_ms: i64) -> TaskResult<Vec<TaskEvent>> {
        let mut timeline = self.timeline.clone();
        let events = timeline.take_due(now_ms);
        if events.is_empty() {
            return Ok(events);
        }

        let mut next = self.tasks.clone();
        for event in &events {
            if let TaskEvent::Removed(id) = event {
                next.retain(|task| task.id != *id);
            }
        }
        if next.len() != self.tasks.len() {
            self.commit(next)?;
        }
        self.timeline = timeline;

        for event in &events {
            debug!(
                "event=task_timeline module=tasks stage={} task_id={}",
                event.stage(),
                event.task_id()
            );
        }
        Ok(events)
    }

    fn next_id(&self, now_ms: i64) -> TaskId {
        match self.tasks.iter().map(|task| task.id).max() {
            Some(newest) if newest >= now_ms => newest.saturating_add(1),
            _ => now_ms,
        }
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Saves `next` and adopts it only when the save succeeds.
    fn commit(&mut self, next: Vec<Task>) -> TaskResult<()> {
        self.repo.save_tasks(&next)?;
        self.tasks = next;
        Ok(())
    }
}
