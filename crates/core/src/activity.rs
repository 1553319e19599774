//! Activity log choice values.

use crate::define_choice_enum;

define_choice_enum! {
    /// Kind of an activity log entry.
    ActivityType ("activity type") {
        Comment = "comment",
        StatusChange = "status_change",
        Assignment = "assignment",
        WorkDone = "work_done",
        View = "view",
    }
}

/// Activity types surfaced by the "recent" feeds.
pub const RECENT_FEED_TYPES: &[ActivityType] = &[ActivityType::WorkDone, ActivityType::View];
