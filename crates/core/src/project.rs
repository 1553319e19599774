//! Project choice values and input limits.

use crate::define_choice_enum;

/// Maximum length of a project name.
pub const MAX_NAME_LENGTH: usize = 255;

/// Maximum length of a project category.
pub const MAX_CATEGORY_LENGTH: usize = 128;

define_choice_enum! {
    /// Project lifecycle status.
    ///
    /// `Completed` is partly derived: see [`crate::progress`] for the rules that
    /// keep it in line with task progress.
    ProjectStatus ("project status") {
        Active = "Active",
        Completed = "Completed",
        OnHold = "On Hold",
    }
}

define_choice_enum! {
    /// Project priority.
    ProjectPriority ("project priority") {
        High = "High",
        Medium = "Medium",
        Low = "Low",
    }
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl Default for ProjectPriority {
    fn default() -> Self {
        Self::Medium
    }
}
