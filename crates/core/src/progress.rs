//! Project progress computation and status reconciliation.
//!
//! A project's `progress` is derived from its child tasks, and its stored
//! `status` is partly managed from that derived value:
//!
//! - [`compute_progress`] turns a set of task weights into a percentage.
//! - [`guard_completion`] rejects an update that tries to mark a project
//!   `Completed` before its tasks get there.
//! - [`reconcile_status`] decides, after a write has been persisted, whether
//!   the stored status needs a follow-up correction.
//! - [`displayed_status`] is the read-path override applied when rendering.
//!
//! All functions are pure. Loading tasks and persisting corrections is the
//! caller's job.

use crate::error::CoreError;
use crate::project::ProjectStatus;
use crate::task::TaskStatus;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Progress at or above which a project counts as complete.
pub const COMPLETION_THRESHOLD: f64 = 100.0;

/// Credit given to a task that is `in_progress` (a `done` task counts as 1.0).
pub const IN_PROGRESS_WEIGHT: f64 = 0.5;

/// Message returned when an update tries to complete an unfinished project.
pub const COMPLETION_GUARD_MESSAGE: &str =
    "Cannot set status to 'Completed' until progress reaches 100%.";

// ---------------------------------------------------------------------------
// Progress calculator
// ---------------------------------------------------------------------------

/// The two task attributes progress depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskWeight {
    pub status: TaskStatus,
    pub story_points: i64,
}

impl TaskWeight {
    pub fn new(status: TaskStatus, story_points: i64) -> Self {
        Self {
            status,
            story_points,
        }
    }

    /// Fraction of this task's weight that counts as finished.
    fn credit(&self) -> f64 {
        match self.status {
            TaskStatus::Done => 1.0,
            TaskStatus::InProgress => IN_PROGRESS_WEIGHT,
            TaskStatus::Todo => 0.0,
        }
    }

    /// Story points, with negative values treated as unestimated.
    ///
    /// Widened so summing many large estimates cannot overflow.
    fn points(&self) -> i128 {
        i128::from(self.story_points.max(0))
    }
}

/// Compute a project's completion percentage from its tasks.
///
/// When any task carries story points, progress is weighted by points.
/// Otherwise each task counts equally. A project with no tasks is at 0%.
/// The result lies in `[0.0, 100.0]` and is rounded to two decimals.
pub fn compute_progress(tasks: &[TaskWeight]) -> f64 {
    let total_sp: i128 = tasks.iter().map(TaskWeight::points).sum();

    let pct = if total_sp > 0 {
        let earned: f64 = tasks
            .iter()
            .map(|t| t.points() as f64 * t.credit())
            .sum();
        earned / total_sp as f64 * 100.0
    } else {
        if tasks.is_empty() {
            return 0.0;
        }
        let earned: f64 = tasks.iter().map(TaskWeight::credit).sum();
        earned / tasks.len() as f64 * 100.0
    };

    round_to_hundredths(pct)
}

/// Round to two decimal places, sending exact ties to the even neighbour
/// (`3.125` becomes `3.12`, `0.375` becomes `0.38`).
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Whether a progress value meets the completion threshold.
pub fn is_complete(progress: f64) -> bool {
    progress >= COMPLETION_THRESHOLD
}

// ---------------------------------------------------------------------------
// Completion guard
// ---------------------------------------------------------------------------

/// Validate a requested status before it is written.
///
/// `current_progress` is the progress of the existing project computed from
/// the tasks it has right now, or `None` when the write creates a new project.
/// Creates are not checked.
pub fn guard_completion(
    requested: Option<ProjectStatus>,
    current_progress: Option<f64>,
) -> Result<(), CoreError> {
    match (requested, current_progress) {
        (Some(ProjectStatus::Completed), Some(pct)) if !is_complete(pct) => {
            Err(CoreError::field("status", COMPLETION_GUARD_MESSAGE))
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Status reconciler
// ---------------------------------------------------------------------------

/// The write that was just persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectWrite {
    Create,
    /// `requested_status` is the status the client explicitly sent, if any.
    Update {
        requested_status: Option<ProjectStatus>,
    },
}

/// Decide whether the stored status must change after a persisted write.
///
/// Returns the status to write, or `None` when the stored value already
/// agrees with `progress` and no further write is needed.
pub fn reconcile_status(
    write: ProjectWrite,
    stored: ProjectStatus,
    progress: f64,
) -> Option<ProjectStatus> {
    if is_complete(progress) {
        return (stored != ProjectStatus::Completed).then_some(ProjectStatus::Completed);
    }

    match write {
        ProjectWrite::Create => None,
        ProjectWrite::Update { requested_status } => {
            if stored != ProjectStatus::Completed {
                return None;
            }
            if requested_status == Some(ProjectStatus::OnHold) {
                None
            } else {
                Some(ProjectStatus::Active)
            }
        }
    }
}

/// Status shown to API clients for a stored status and current progress.
///
/// Complete projects always render as `Completed`; a stale `Completed` below
/// the threshold renders as `Active`. Anything else renders as stored.
pub fn displayed_status(stored: ProjectStatus, progress: f64) -> ProjectStatus {
    if is_complete(progress) {
        ProjectStatus::Completed
    } else if stored == ProjectStatus::Completed {
        ProjectStatus::Active
    } else {
        stored
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
