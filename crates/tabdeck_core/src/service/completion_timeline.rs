//! Two-stage removal timeline for completed tasks.
//!
//! # Responsibility
//! - Track completed tasks waiting for fade-out and removal.
//! - Report due stages in firing order when time advances.
//!
//! # Invariants
//! - Fade-out fires [`FADE_OUT_DELAY_MS`] after completion.
//! - Removal fires [`REMOVAL_DELAY_MS`] after fade-out.
//! - A task is scheduled at most once.

use crate::model::task::TaskId;

/// Delay between completion and fade-out start.
pub const FADE_OUT_DELAY_MS: i64 = 500;
/// Delay between fade-out start and removal.
pub const REMOVAL_DELAY_MS: i64 = 1_500;

/// Timeline stage fired for a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskEvent {
    FadeOutStarted(TaskId),
    Removed(TaskId),
}

impl TaskEvent {
    pub fn task_id(self) -> TaskId {
        match self {
            Self::FadeOutStarted(id) | Self::Removed(id) => id,
        }
    }

    /// Stable stage label for logs and bridge payloads.
    pub fn stage(self) -> &'static str {
        match self {
            Self::FadeOutStarted(_) => "fade_out",
            Self::Removed(_) => "removed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRemoval {
    task_id: TaskId,
    completed_at_ms: i64,
    fading: bool,
}

impl PendingRemoval {
    fn fade_out_at(&self) -> i64 {
        self.completed_at_ms.saturating_add(FADE_OUT_DELAY_MS)
    }

    fn remove_at(&self) -> i64 {
        self.fade_out_at().saturating_add(REMOVAL_DELAY_MS)
    }
}

/// Pending completion stages, ordered by scheduling time.
#[derive(Debug, Clone, Default)]
pub struct CompletionTimeline {
    pending: Vec<PendingRemoval>,
}

impl CompletionTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules both stages for `task_id`. Returns `false` when already scheduled.
    pub fn schedule(&mut self, task_id: TaskId, completed_at_ms: i64) -> bool {
        if self.is_scheduled(task_id) {
            return false;
        }
        self.pending.push(PendingRemoval {
            task_id,
            completed_at_ms,
            fading: false,
        });
        true
    }

    /// Drops any pending stages for `task_id`.
    pub fn cancel(&mut self, task_id: TaskId) {
        self.pending.retain(|entry| entry.task_id != task_id);
    }

    pub fn is_scheduled(&self, task_id: TaskId) -> bool {
        self.pending.iter().any(|entry| entry.task_id == task_id)
    }

    /// Whether `task_id` has started fading out but is not removed yet.
    pub fn is_fading(&self, task_id: TaskId) -> bool {
        self.pending
            .iter()
            .any(|entry| entry.task_id == task_id && entry.fading)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest instant at which [`Self::take_due`] will report something.
    pub fn next_due_at(&self) -> Option<i64> {
        self.pending
            .iter()
            .map(|entry| {
                if entry.fading {
                    entry.remove_at()
                } else {
                    entry.fade_out_at()
                }
            })
            .min()
    }

    /// Fires every stage due at `now_ms`, in firing order.
    ///
    /// A task whose completion is older than the full delay reports both
    /// stages in the same call.
    pub fn take_due(&mut self, now_ms: i64) -> Vec<TaskEvent> {
        let mut fired: Vec<(i64, usize, TaskEvent)> = Vec::new();

        for (order, entry) in self.pending.iter_mut().enumerate() {
            if !entry.fading && now_ms >= entry.fade_out_at() {
                entry.fading = true;
                fired.push((
                    entry.fade_out_at(),
                    order,
                    TaskEvent::FadeOutStarted(entry.task_id),
                ));
            }
            if entry.fading && now_ms >= entry.remove_at() {
                fired.push((entry.remove_at(), order, TaskEvent::Removed(entry.task_id)));
            }
        }

        self.pending.retain(|entry| !(entry.fading && now_ms >= entry.remove_at()));
        fired.sort_by_key(|(due_at, order, _)| (*due_at, *order));
        fired.into_iter().map(|(_, _, event)| event).collect()
    }
}
