//! To-do task model.
//!
//! # Responsibility
//! - Define the persisted task record and its wire shape.
//! - Validate text and due date before a task reaches storage.
//!
//! # Invariants
//! - `text` is non-empty after trimming.
//! - `date`, when set, is a real calendar day in `YYYY-MM-DD` form.
//! - `id` is the creation timestamp in epoch milliseconds and unique within a list.

use crate::model::due_date::normalize_due_date;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Task identifier (creation epoch milliseconds).
pub type TaskId = i64;

/// Validation failures for task fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Text is empty or whitespace only.
    EmptyText,
    /// Due date is not a `YYYY-MM-DD` calendar day.
    InvalidDate(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text cannot be empty"),
            Self::InvalidDate(value) => {
                write!(f, "invalid due date `{value}`; expected YYYY-MM-DD")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// One to-do entry. Serialized as `{id, text, completed, date}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    /// `null` on the wire when the task has no due date.
    #[serde(default)]
    pub date: Option<String>,
}

impl Task {
    /// Builds an open task with trimmed text and a normalized due date.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is blank.
    /// - `InvalidDate` when `date` is non-blank and not a calendar day.
    pub fn new(id: TaskId, text: &str, date: Option<&str>) -> Result<Self, TaskValidationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskValidationError::EmptyText);
        }

        Ok(Self {
            id,
            text: text.to_string(),
            completed: false,
            date: normalize_due_date(date)?,
        })
    }

    /// Checks invariants on an already-built task (e.g. read back from storage).
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.text.trim().is_empty() {
            return Err(TaskValidationError::EmptyText);
        }
        if let Some(date) = self.date.as_deref() {
            if normalize_due_date(Some(date))?.as_deref() != Some(date) {
                return Err(TaskValidationError::InvalidDate(date.to_string()));
            }
        }
        Ok(())
    }
}
