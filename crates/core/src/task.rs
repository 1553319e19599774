//! Task choice values and input limits.

use crate::define_choice_enum;

/// Maximum length of a task title.
pub const MAX_TITLE_LENGTH: usize = 255;

define_choice_enum! {
    /// Workflow state of a task.
    TaskStatus ("task status") {
        Todo = "todo",
        InProgress = "in_progress",
        Done = "done",
    }
}

define_choice_enum! {
    /// Task priority.
    TaskPriority ("task priority") {
        Low = "low",
        Medium = "medium",
        High = "high",
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Todo
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}
